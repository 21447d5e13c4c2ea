//! The catalog of selectable names.

use std::collections::BTreeSet;

use crate::model::NameRecord;

/// The sorted, deduplicated set of names present in a catalog response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
  names: Vec<String>,
}

impl Catalog {
  /// The label of the leading "no selection" option.
  pub const PLACEHOLDER: &'static str = "Select a name...";

  /// Builds a catalog out of every distinct, non-empty name in `records`.
  pub fn from_records<'a>(
    records: impl IntoIterator<Item = &'a NameRecord>,
  ) -> Self {
    let names = records
      .into_iter()
      .map(|r| r.name.as_str())
      .filter(|n| !n.is_empty())
      .collect::<BTreeSet<_>>();
    Self {
      names: names.into_iter().map(String::from).collect(),
    }
  }

  /// Returns the names, in ascending order.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// Returns the number of distinct names.
  pub fn len(&self) -> usize {
    self.names.len()
  }

  /// Returns whether there are no names at all.
  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}
