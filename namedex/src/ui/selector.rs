//! The name selector's options and cursor.

use babynames::model::Catalog;

/// The selector's options: the placeholder, then every catalog name.
///
/// A selector built with [`Selector::default()`] has no options at all, not
/// even the placeholder; that is what the UI shows while the catalog loads.
#[derive(Clone, Debug, Default)]
pub struct Selector {
  names: Vec<String>,
  loaded: bool,

  // Index into the options, where 0 is the placeholder. Always in range once
  // loaded.
  cursor: usize,
}

impl Selector {
  /// Builds a selector over `catalog`, with the cursor on the placeholder.
  pub fn from_catalog(catalog: &Catalog) -> Self {
    Self {
      names: catalog.names().to_vec(),
      loaded: true,
      cursor: 0,
    }
  }

  /// Returns the number of options, placeholder included.
  pub fn len(&self) -> usize {
    if self.loaded {
      self.names.len() + 1
    } else {
      0
    }
  }

  /// Returns every option's label, placeholder first.
  pub fn labels(&self) -> Vec<&str> {
    if !self.loaded {
      return Vec::new();
    }
    let mut labels = Vec::with_capacity(self.len());
    labels.push(Catalog::PLACEHOLDER);
    labels.extend(self.names.iter().map(String::as_str));
    labels
  }

  /// Returns the index of the option under the cursor.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Returns the name under the cursor; `None` on the placeholder.
  pub fn current(&self) -> Option<&str> {
    self
      .cursor
      .checked_sub(1)
      .and_then(|i| self.names.get(i))
      .map(String::as_str)
  }

  /// Moves the cursor by `delta` options, stopping at either end.
  ///
  /// Returns whether the cursor moved.
  pub fn move_by(&mut self, delta: isize) -> bool {
    let last = self.len().saturating_sub(1) as isize;
    let target = (self.cursor as isize).saturating_add(delta).clamp(0, last);
    self.move_to(target as usize)
  }

  /// Moves the cursor to `index`, if that is an option.
  pub fn move_to(&mut self, index: usize) -> bool {
    if index == self.cursor || index >= self.len() {
      return false;
    }
    self.cursor = index;
    true
  }

  /// Moves the cursor to the last option.
  pub fn move_to_end(&mut self) -> bool {
    self.move_to(self.len().saturating_sub(1))
  }
}
