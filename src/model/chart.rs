//! Rank charts.
//!
//! A [`Chart`] is the fully laid-out form of one name's records: one [`Bar`]
//! per year in ascending year order, plus the name's meaning. Charts are
//! recomputed from scratch for every selection.

use crate::model::NameRecord;

/// The tallest bar a chart can contain, reached at rank 1.
pub const MAX_HEIGHT: u32 = 249;

/// The label drawn in place of a rank for years the name was not ranked.
pub const NO_DATA: &str = "(no data)";

/// Returns the height of the bar for `rank`.
///
/// Unranked years are flat; otherwise the height is `(1000 - rank) / 4`,
/// rounded down and never negative.
pub fn bar_height(rank: Option<u32>) -> u32 {
  match rank {
    None => 0,
    Some(r) => (1000 - i64::from(r)).max(0) as u32 / 4,
  }
}

/// Returns whether a bar for `rank` is drawn highlighted (a top-ten year).
pub fn is_highlighted(rank: Option<u32>) -> bool {
  matches!(rank, Some(1..=10))
}

/// Horizontal placement of bars: bar `i` sits at `origin + i * stride`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
  /// The offset of the first bar.
  pub origin: u32,
  /// The distance between consecutive bars.
  pub stride: u32,
}

impl Default for Geometry {
  fn default() -> Self {
    Self {
      origin: 10,
      stride: 60,
    }
  }
}

/// One year's bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bar {
  /// The year, if the record had a readable one.
  pub year: Option<i64>,
  /// The rank, if the name was ranked that year.
  pub rank: Option<u32>,
  /// The height of the bar; see [`bar_height()`].
  pub height: u32,
  /// The horizontal offset of the bar and its year label.
  pub offset: u32,
  /// Whether this is a top-ten year.
  pub highlighted: bool,
}

impl Bar {
  /// Returns the text of the year label under the bar.
  pub fn year_label(&self) -> String {
    match self.year {
      Some(y) => y.to_string(),
      None => "?".to_string(),
    }
  }

  /// Returns the text drawn on the bar: the rank, or [`NO_DATA`].
  pub fn value_label(&self) -> String {
    match self.rank {
      Some(r) => r.to_string(),
      None => NO_DATA.to_string(),
    }
  }
}

/// A laid-out rank chart for a single name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chart {
  bars: Vec<Bar>,
  meaning: Option<String>,
}

impl Chart {
  /// Lays out `records` using the default [`Geometry`].
  pub fn new(records: &[NameRecord]) -> Self {
    Self::with_geometry(records, Geometry::default())
  }

  /// Lays out `records` using `geometry`.
  ///
  /// Records are ordered by ascending year; the sort is stable, and rows with
  /// no readable year go last. Unranked years keep their slot and label, with
  /// a flat bar.
  pub fn with_geometry(records: &[NameRecord], geometry: Geometry) -> Self {
    let mut sorted = records.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|r| (r.year().is_none(), r.year()));

    let bars = sorted
      .iter()
      .enumerate()
      .map(|(i, r)| {
        let rank = r.rank();
        Bar {
          year: r.year(),
          rank,
          height: bar_height(rank),
          offset: geometry
            .origin
            .saturating_add(geometry.stride.saturating_mul(i as u32)),
          highlighted: is_highlighted(rank),
        }
      })
      .collect();

    let meaning = sorted.iter().find_map(|r| r.meaning()).map(String::from);

    Self { bars, meaning }
  }

  /// Returns the bars, in ascending year order.
  pub fn bars(&self) -> &[Bar] {
    &self.bars
  }

  /// Returns the first non-blank meaning among the records, in year order.
  pub fn meaning(&self) -> Option<&str> {
    self.meaning.as_deref()
  }

  /// Returns whether the chart has no bars.
  pub fn is_empty(&self) -> bool {
    self.bars.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::model::Lenient;

  fn row(year: &str, rank: &str, meaning: Option<&str>) -> NameRecord {
    NameRecord {
      name: "Ada".to_string(),
      year: Lenient::parse(year),
      rank: Lenient::parse(rank),
      meaning: meaning.map(String::from),
    }
  }

  #[test]
  fn heights_follow_rank() {
    assert_eq!(bar_height(None), 0);
    assert_eq!(bar_height(Some(1)), MAX_HEIGHT);
    assert_eq!(bar_height(Some(5)), 248);
    assert_eq!(bar_height(Some(999)), 0);
    assert_eq!(bar_height(Some(1000)), 0);
    assert_eq!(bar_height(Some(5000)), 0);
    assert_eq!(bar_height(Some(13)), 246);
  }

  #[test]
  fn only_top_ten_is_highlighted() {
    assert!(!is_highlighted(None));
    assert!(is_highlighted(Some(1)));
    assert!(is_highlighted(Some(10)));
    assert!(!is_highlighted(Some(11)));
  }

  #[test]
  fn unranked_year_sorts_before_ranked_one() {
    let chart = Chart::new(&[row("2000", "5", None), row("1999", "0", None)]);
    let bars = chart.bars();

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].year, Some(1999));
    assert_eq!(bars[0].height, 0);
    assert_eq!(bars[0].value_label(), NO_DATA);
    assert!(!bars[0].highlighted);

    assert_eq!(bars[1].year, Some(2000));
    assert_eq!(bars[1].height, 248);
    assert_eq!(bars[1].value_label(), "5");
    assert!(bars[1].highlighted);
  }

  #[test]
  fn years_are_sorted_numerically() {
    let chart = Chart::new(&[
      row("2010", "40", None),
      row("980", "1", None),
      row("", "3", None),
      row("1995", "200", None),
    ]);
    let years = chart.bars().iter().map(|b| b.year).collect::<Vec<_>>();
    assert_eq!(years, vec![Some(980), Some(1995), Some(2010), None]);
    assert_eq!(chart.bars()[3].year_label(), "?");
  }

  #[test]
  fn offsets_follow_geometry() {
    let records = [row("1", "1", None), row("2", "1", None), row("3", "1", None)];

    let offsets = Chart::new(&records)
      .bars()
      .iter()
      .map(|b| b.offset)
      .collect::<Vec<_>>();
    assert_eq!(offsets, vec![10, 70, 130]);

    let geometry = Geometry {
      origin: 0,
      stride: 8,
    };
    let offsets = Chart::with_geometry(&records, geometry)
      .bars()
      .iter()
      .map(|b| b.offset)
      .collect::<Vec<_>>();
    assert_eq!(offsets, vec![0, 8, 16]);
  }

  #[test]
  fn meaning_is_first_non_blank_after_sort() {
    let chart = Chart::new(&[
      row("2001", "9", Some("later")),
      row("2000", "9", Some(" ")),
      row("1999", "9", None),
      row("2000", "9", Some("earlier")),
    ]);
    assert_eq!(chart.meaning(), Some("earlier"));
  }

  #[test]
  fn no_meaning_leaves_it_empty() {
    let chart = Chart::new(&[row("2000", "9", None), row("2001", "9", Some(""))]);
    assert_eq!(chart.meaning(), None);
  }

  #[test]
  fn empty_records_give_empty_chart() {
    let chart = Chart::new(&[]);
    assert!(chart.is_empty());
    assert_eq!(chart.meaning(), None);
  }
}
