//! A client for the baby name popularity API.

use std::io;
use std::io::Read;

use reqwest::blocking::Client;
use reqwest::Url;

use crate::cache::Cache;
use crate::cache::MemoryCache;
use crate::model::NameRecord;

/// The public spreadsheet the API serves by default.
pub const DEFAULT_BASE_URL: &str =
  "https://api.sheetbest.com/sheets/c1e0ead6-6df0-49f7-ace0-ec90562a8c3f";

/// An API client.
///
/// This type is the entrypoint for downloading name records. Two endpoints
/// exist: the catalog at the base URL, listing every record, and
/// `{base}/name/{name}`, listing the records for a single name. Successful
/// responses are memoized in a [`Cache`].
pub struct Api<C = MemoryCache> {
  base_url: String,
  cache: C,
  client: Client,
}

/// Options for constructing an [`Api`].
pub struct Options<C> {
  /// The base URL to point the client at.
  pub base_url: String,
  /// The cache to use with the client.
  pub cache: C,
}

/// An [`Api`] client error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Http(#[from] reqwest::Error),

  #[error("HTTP {status}: {reason}")]
  Status { status: u16, reason: String },

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("invalid API URL {url}: {message}")]
  BadUrl { url: String, message: String },
}

impl Error {
  /// Returns whether this error means the server answered, but with something
  /// that is not a list of records.
  pub fn is_malformed(&self) -> bool {
    matches!(self, Error::Json(_))
  }
}

impl Api {
  /// Creates a new [`Api`] with the default cache and URL.
  pub fn new() -> Self {
    Self::with_cache(MemoryCache::unbounded())
  }
}

impl Default for Api {
  fn default() -> Self {
    Self::new()
  }
}

impl<C> Api<C> {
  /// Creates a new [`Api`] with the given cache.
  pub fn with_cache(cache: C) -> Self {
    Self::with_options(Options {
      base_url: DEFAULT_BASE_URL.to_string(),
      cache,
    })
  }

  /// Creates a new [`Api`] with the given options.
  pub fn with_options(opts: Options<C>) -> Self {
    Self {
      base_url: opts.base_url,
      cache: opts.cache,
      client: Client::new(),
    }
  }

  /// Replaces the HTTP client used for requests.
  pub fn with_client(mut self, client: Client) -> Self {
    self.client = client;
    self
  }

  /// Returns the base URL this client points at.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Builds the URL for the path `segments` under the base URL, encoding each
  /// segment on its own so that a name containing `/` or `?` stays one
  /// segment.
  fn url(&self, segments: &[&str]) -> Result<Url, Error> {
    let bad_url = |message: String| Error::BadUrl {
      url: self.base_url.clone(),
      message,
    };

    let mut url = Url::parse(&self.base_url).map_err(|e| bad_url(e.to_string()))?;
    if !segments.is_empty() {
      url
        .path_segments_mut()
        .map_err(|()| bad_url("URL cannot have a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    }
    Ok(url)
  }
}

impl<C: Cache> Api<C> {
  /// Base request-generating function, with caching.
  fn request(&self, url: Url) -> Result<Vec<NameRecord>, Error> {
    let client = &self.client;
    self.cache.get_or_insert(String::from(url), |url| {
      tracing::debug!(%url, "requesting");
      let mut response = client.get(url).send()?;

      let status = response.status();
      if !status.is_success() {
        return Err(Error::Status {
          status: status.as_u16(),
          reason: status.canonical_reason().unwrap_or("").to_string(),
        });
      }

      let mut buf = Vec::new();
      response.read_to_end(&mut buf)?;
      let records: Vec<NameRecord> = serde_json::from_slice(&buf)?;
      tracing::debug!(%url, records = records.len(), "received");
      Ok(records)
    })
  }

  /// Downloads every record in the catalog.
  pub fn catalog(&self) -> Result<Vec<NameRecord>, Error> {
    self.request(self.url(&[])?)
  }

  /// Downloads the records for the name `name`.
  pub fn rankings(&self, name: &str) -> Result<Vec<NameRecord>, Error> {
    self.request(self.url(&["name", name])?)
  }
}

/// A source of [`NameRecord`]s.
///
/// [`Api`] is the real implementation; the trait exists so that consumers can
/// be driven by canned data instead.
pub trait Source: Send + Sync {
  /// Downloads every record in the catalog.
  fn catalog(&self) -> Result<Vec<NameRecord>, Error>;

  /// Downloads the records for the name `name`.
  fn rankings(&self, name: &str) -> Result<Vec<NameRecord>, Error>;
}

impl<C: Cache> Source for Api<C> {
  fn catalog(&self) -> Result<Vec<NameRecord>, Error> {
    Api::catalog(self)
  }

  fn rankings(&self, name: &str) -> Result<Vec<NameRecord>, Error> {
    Api::rankings(self, name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::io::BufRead;
  use std::io::BufReader;
  use std::io::Write;
  use std::net::TcpListener;
  use std::thread;
  use std::thread::JoinHandle;

  /// Serves `responses` one connection at a time, and returns each request
  /// line that was received.
  fn serve(
    responses: Vec<(u16, &'static str, &'static str)>,
  ) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/sheets", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
      let mut requests = Vec::new();
      for (status, reason, body) in responses {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        requests.push(line.trim_end().to_string());
        loop {
          let mut header = String::new();
          reader.read_line(&mut header).unwrap();
          if header == "\r\n" || header.is_empty() {
            break;
          }
        }

        let mut stream = reader.into_inner();
        write!(
          stream,
          "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\n\
           Content-Length: {}\r\nConnection: close\r\n\r\n{}",
          status,
          reason,
          body.len(),
          body
        )
        .unwrap();
        stream.flush().unwrap();
      }
      requests
    });
    (base, handle)
  }

  fn api(base_url: String) -> Api {
    let client = Client::builder().no_proxy().build().unwrap();
    Api::with_options(Options {
      base_url,
      cache: MemoryCache::unbounded(),
    })
    .with_client(client)
  }

  #[test]
  fn catalog_reads_base_url() {
    let (base, server) = serve(vec![(
      200,
      "OK",
      r#"[{"name":"Ada","year":"2000","rank":"5"},{"name":"Bea","year":2001}]"#,
    )]);
    let records = api(base).catalog().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Ada");
    assert_eq!(records[0].rank(), Some(5));
    assert_eq!(records[1].rank(), None);
    assert_eq!(server.join().unwrap(), vec!["GET /sheets HTTP/1.1"]);
  }

  #[test]
  fn rankings_encode_the_name_as_one_segment() {
    let (base, server) = serve(vec![(200, "OK", "[]")]);
    let records = api(base).rankings("Mary Ann/Jo").unwrap();

    assert!(records.is_empty());
    assert_eq!(
      server.join().unwrap(),
      vec!["GET /sheets/name/Mary%20Ann%2FJo HTTP/1.1"]
    );
  }

  #[test]
  fn non_success_status_is_an_error() {
    let (base, server) = serve(vec![(404, "Not Found", "{}")]);
    let err = api(base).rankings("Ada").unwrap_err();

    assert!(matches!(err, Error::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
    assert!(!err.is_malformed());
    server.join().unwrap();
  }

  #[test]
  fn non_array_body_is_malformed() {
    let (base, server) = serve(vec![(200, "OK", r#"{"error":"nope"}"#)]);
    let err = api(base).catalog().unwrap_err();

    assert!(err.is_malformed());
    server.join().unwrap();
  }

  #[test]
  fn successful_responses_are_cached() {
    // Only one response is served; a second network request would fail.
    let (base, server) = serve(vec![(200, "OK", r#"[{"name":"Ada"}]"#)]);
    let api = api(base);

    let first = api.rankings("Ada").unwrap();
    let second = api.rankings("Ada").unwrap();
    assert_eq!(first, second);
    assert_eq!(server.join().unwrap().len(), 1);
  }

  #[test]
  fn bad_base_url_is_reported() {
    let api = api("not a url".to_string());
    assert!(matches!(api.catalog(), Err(Error::BadUrl { .. })));
  }

  #[test]
  fn trailing_slash_in_base_is_dropped() {
    let api = api("http://example.com/sheets/".to_string());
    assert_eq!(
      api.url(&["name", "Zoë"]).unwrap().as_str(),
      "http://example.com/sheets/name/Zo%C3%AB"
    );
  }
}
