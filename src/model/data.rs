//! Generic data structures for capturing loosely-typed spreadsheet cells.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde_json::Value;

/// An integer cell that may arrive as either a JSON number or a string.
///
/// Spreadsheet-backed APIs are not picky about types: the same column can hold
/// `2000`, `"2000"`, `""` or nothing at all. Strings are read the way a lenient
/// integer parser would: leading whitespace and an optional sign are accepted,
/// then as many digits as are present; anything after them is ignored.
///
/// A cell with no leading digits, or one that is `null`, absent, or some other
/// JSON type entirely, is empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Lenient(Option<i64>);

impl Lenient {
  /// Creates a new [`Lenient`] with the given value.
  pub fn new(value: Option<i64>) -> Self {
    Self(value)
  }

  /// Parses `s` leniently.
  pub fn parse(s: &str) -> Self {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
      Some(b'-') => (true, &s[1..]),
      Some(b'+') => (false, &s[1..]),
      _ => (false, s),
    };

    let end = digits
      .find(|c: char| !c.is_ascii_digit())
      .unwrap_or_else(|| digits.len());
    let value = digits[..end].parse::<i64>().ok();
    Self(value.map(|n| if negative { -n } else { n }))
  }

  /// Returns the parsed value, if there is one.
  pub fn get(self) -> Option<i64> {
    self.0
  }
}

impl fmt::Display for Lenient {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.0 {
      Some(n) => write!(f, "{}", n),
      None => f.write_str("?"),
    }
  }
}

impl<'de> Deserialize<'de> for Lenient {
  fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
      Some(Value::Number(n)) => match n.as_i64() {
        Some(n) => Self(Some(n)),
        None => Self(
          n.as_f64()
            .filter(|x| x.is_finite())
            .map(|x| x.trunc() as i64),
        ),
      },
      Some(Value::String(s)) => Self::parse(&s),
      _ => Self(None),
    })
  }
}

/// Deserializes a free-text cell.
///
/// Numbers and booleans read as their JSON text; `null`, arrays and objects
/// read as empty.
pub fn text<'de, D: Deserializer<'de>>(
  de: D,
) -> Result<Option<String>, D::Error> {
  Ok(match Option::<Value>::deserialize(de)? {
    Some(Value::String(s)) => Some(s),
    Some(Value::Number(n)) => Some(n.to_string()),
    Some(Value::Bool(b)) => Some(b.to_string()),
    _ => None,
  })
}

/// Like [`text()`], but empty cells read as the empty string.
pub fn text_or_empty<'de, D: Deserializer<'de>>(
  de: D,
) -> Result<String, D::Error> {
  text(de).map(Option::unwrap_or_default)
}
