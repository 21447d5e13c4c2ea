//! Utilities for running API requests off the UI thread.
//!
//! [`Download`] is a value that is fetched once, in the background.
//! [`Requests`] is a stream of requests where only the most recently issued
//! one matters; responses to older requests are dropped on arrival.

use std::thread;

use crossbeam::channel;
use crossbeam::channel::Receiver;
use crossbeam::channel::Sender;
use crossbeam::channel::TryRecvError;

/// A value that may need to be downloaded.
pub struct Download<T>(DownloadInner<T>);

enum DownloadInner<T> {
  NotStarted,
  Pending(Receiver<T>),
  Done(T),
  Lost,
}

impl<T: Send + 'static> Download<T> {
  /// Creates a new [`Download`].
  pub fn new() -> Self {
    Self(DownloadInner::NotStarted)
  }

  /// Starts a download using `body`.
  ///
  /// If this function has been called before, it will do nothing; it is
  /// idempotent.
  pub fn start(&mut self, body: impl FnOnce() -> T + Send + 'static) {
    match &self.0 {
      DownloadInner::NotStarted => {}
      _ => return,
    }

    let (out, chan) = channel::bounded(1);
    thread::spawn(move || {
      let _ = out.send(body());
    });

    self.0 = DownloadInner::Pending(chan);
  }

  /// Returns whether the download has been started but has not finished.
  pub fn is_pending(&self) -> bool {
    matches!(self.0, DownloadInner::Pending(_))
  }

  /// Returns whether the download thread exited without producing a value.
  pub fn is_lost(&self) -> bool {
    matches!(self.0, DownloadInner::Lost)
  }

  /// Checks in on the download.
  ///
  /// If the download has finished, the result is returned.
  pub fn try_finish(&mut self) -> Option<&T> {
    if let DownloadInner::Pending(chan) = &self.0 {
      match chan.try_recv() {
        Ok(val) => self.0 = DownloadInner::Done(val),
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => {
          tracing::error!("download thread exited without a result");
          self.0 = DownloadInner::Lost;
        }
      }
    }

    match &self.0 {
      DownloadInner::Done(val) => Some(val),
      _ => None,
    }
  }
}

/// A response tagged with the token of the request that produced it.
struct Tagged<T> {
  token: u64,
  value: T,
}

/// A sequence of background requests, of which only the latest is wanted.
///
/// Each call to [`Requests::issue()`] hands out a new, strictly larger token.
/// Responses are only ever surfaced for the latest token; anything older is
/// discarded when it arrives.
pub struct Requests<T> {
  latest: u64,
  sink: Sender<Tagged<T>>,
  chan: Receiver<Tagged<T>>,
}

impl<T: Send + 'static> Requests<T> {
  /// Creates a new [`Requests`] with nothing in flight.
  pub fn new() -> Self {
    let (sink, chan) = channel::unbounded();
    Self {
      latest: 0,
      sink,
      chan,
    }
  }

  /// Runs `body` on a new thread, superseding every earlier request.
  pub fn issue(&mut self, body: impl FnOnce() -> T + Send + 'static) -> u64 {
    self.latest += 1;
    let token = self.latest;
    let sink = self.sink.clone();
    thread::spawn(move || {
      let _ = sink.send(Tagged {
        token,
        value: body(),
      });
    });
    token
  }

  /// Supersedes every request in flight without issuing a new one.
  pub fn cancel(&mut self) {
    self.latest += 1;
  }

  /// Returns the response to the latest request, if it has arrived.
  pub fn try_recv(&mut self) -> Option<T> {
    while let Ok(tagged) = self.chan.try_recv() {
      if let Some(value) = self.accept(tagged) {
        return Some(value);
      }
    }
    None
  }

  /// Waits up to `timeout` for the response to the latest request.
  #[cfg(test)]
  pub fn recv_timeout(&mut self, timeout: std::time::Duration) -> Option<T> {
    let deadline = std::time::Instant::now() + timeout;
    while let Ok(tagged) = self.chan.recv_deadline(deadline) {
      if let Some(value) = self.accept(tagged) {
        return Some(value);
      }
    }
    None
  }

  fn accept(&self, tagged: Tagged<T>) -> Option<T> {
    if tagged.token != self.latest {
      tracing::debug!(
        token = tagged.token,
        latest = self.latest,
        "discarding stale response"
      );
      return None;
    }
    Some(tagged.value)
  }
}
