//! Caching utilities.

use std::sync::Mutex;
use std::sync::MutexGuard;

use lru::LruCache;

use crate::model::NameRecord;

#[cfg(doc)]
use crate::api::Api;

/// A type that can cache an [`Api`]'s responses.
///
/// Caches are shared between the threads that issue requests, so they must be
/// `Send + Sync`.
pub trait Cache: Send + Sync {
  /// Try to get the cached records with the key `String`; if they're not
  /// present, compute them using `f`.
  ///
  /// If `f` returns an error, that is returned and no insertion occurs.
  fn get_or_insert<E, F: FnOnce(&str) -> Result<Vec<NameRecord>, E>>(
    &self,
    key: String,
    f: F,
  ) -> Result<Vec<NameRecord>, E>;
}

/// An in-memory LRU cache.
///
/// A cache with capacity zero never stores anything, so every lookup goes to
/// the network.
pub struct MemoryCache(Option<Mutex<LruCache<String, Vec<NameRecord>>>>);

impl MemoryCache {
  /// Returns a cache with unbounded size.
  pub fn unbounded() -> Self {
    Self(Some(Mutex::new(LruCache::unbounded())))
  }

  /// Returns a cache that will keep at most `capacity` responses in memory.
  pub fn bounded(capacity: usize) -> Self {
    if capacity == 0 {
      return Self::disabled();
    }
    Self(Some(Mutex::new(LruCache::new(capacity))))
  }

  /// Returns a cache that never caches.
  pub fn disabled() -> Self {
    Self(None)
  }

  /// Returns the number of cached responses.
  pub fn len(&self) -> usize {
    self.0.as_ref().map(|c| lock(c).len()).unwrap_or(0)
  }

  /// Returns whether nothing is cached.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// A panic while holding the lock cannot leave the LRU half-updated in a way
// that matters to us, so poisoning is ignored.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(|e| e.into_inner())
}

impl Cache for MemoryCache {
  fn get_or_insert<E, F: FnOnce(&str) -> Result<Vec<NameRecord>, E>>(
    &self,
    key: String,
    f: F,
  ) -> Result<Vec<NameRecord>, E> {
    let cache = match &self.0 {
      Some(cache) => cache,
      None => return f(&key),
    };

    if let Some(val) = lock(cache).get(&key) {
      tracing::trace!(%key, "cache hit");
      return Ok(val.clone());
    }

    // The lock is not held across `f`, so a slow request does not stall
    // lookups for other keys.
    let val = f(&key)?;
    lock(cache).put(key, val.clone());
    Ok(val)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::Cell;

  fn rows(name: &str) -> Vec<NameRecord> {
    vec![NameRecord {
      name: name.to_string(),
      ..NameRecord::default()
    }]
  }

  #[test]
  fn hit_skips_compute() {
    let cache = MemoryCache::unbounded();
    let calls = Cell::new(0);
    let fetch = |k: &str| -> Result<_, ()> {
      calls.set(calls.get() + 1);
      Ok(rows(k))
    };

    let a = cache.get_or_insert("Ada".to_string(), fetch).unwrap();
    let b = cache.get_or_insert("Ada".to_string(), fetch).unwrap();
    assert_eq!(a, b);
    assert_eq!(calls.get(), 1);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn errors_are_not_cached() {
    let cache = MemoryCache::unbounded();
    let r = cache.get_or_insert("Ada".to_string(), |_| Err("boom"));
    assert_eq!(r, Err("boom"));
    assert!(cache.is_empty());

    let r = cache.get_or_insert("Ada".to_string(), |k| Ok::<_, &str>(rows(k)));
    assert_eq!(r, Ok(rows("Ada")));
  }

  #[test]
  fn bounded_cache_evicts_oldest() {
    let cache = MemoryCache::bounded(2);
    for key in &["a", "b", "c"] {
      let _ = cache.get_or_insert(key.to_string(), |k| Ok::<_, ()>(rows(k)));
    }
    assert_eq!(cache.len(), 2);

    let calls = Cell::new(0);
    let _ = cache.get_or_insert("a".to_string(), |k| {
      calls.set(calls.get() + 1);
      Ok::<_, ()>(rows(k))
    });
    assert_eq!(calls.get(), 1);
  }

  #[test]
  fn zero_capacity_never_caches() {
    let cache = MemoryCache::bounded(0);
    let calls = Cell::new(0);
    for _ in 0..3 {
      let _ = cache.get_or_insert("a".to_string(), |k| {
        calls.set(calls.get() + 1);
        Ok::<_, ()>(rows(k))
      });
    }
    assert_eq!(calls.get(), 3);
    assert!(cache.is_empty());
  }
}
