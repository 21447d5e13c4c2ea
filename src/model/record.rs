//! Raw records, as returned by the API.

use serde::Deserialize;

use crate::model::data;
use crate::model::Lenient;

/// A single spreadsheet row: one name's rank in one year.
///
/// Identity is the `(name, year)` pair. Every field is optional on the wire;
/// missing, `null` or oddly-typed cells read as empty rather than failing the
/// whole response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NameRecord {
  /// The name this row describes.
  #[serde(default, deserialize_with = "data::text_or_empty")]
  pub name: String,
  /// The year the rank was recorded in.
  #[serde(default)]
  pub year: Lenient,
  /// The popularity rank; zero or empty means "not ranked that year".
  #[serde(default)]
  pub rank: Lenient,
  /// A free-text definition of the name, often repeated across rows.
  #[serde(default, deserialize_with = "data::text")]
  pub meaning: Option<String>,
}

impl NameRecord {
  /// Returns the year of this record, if it has one.
  pub fn year(&self) -> Option<i64> {
    self.year.get()
  }

  /// Returns the rank of this record if it was ranked that year.
  ///
  /// Zero, negative and missing ranks are all "unranked".
  pub fn rank(&self) -> Option<u32> {
    self
      .rank
      .get()
      .filter(|&r| r > 0)
      .map(|r| r.min(u32::MAX as i64) as u32)
  }

  /// Returns the meaning of this name, if this record carries a non-blank one.
  pub fn meaning(&self) -> Option<&str> {
    self
      .meaning
      .as_deref()
      .map(str::trim)
      .filter(|m| !m.is_empty())
  }
}
