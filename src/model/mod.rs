//! Structs describing the name popularity data model.
//!
//! Raw [`NameRecord`]s come straight off the wire; a [`Catalog`] and a
//! [`Chart`] are derived from them for display.

pub mod catalog;
pub mod chart;
pub mod data;
pub mod record;

pub use catalog::Catalog;
pub use chart::Bar;
pub use chart::Chart;
pub use chart::Geometry;
pub use data::Lenient;
pub use record::NameRecord;
