//! `babynames` is a client library for a spreadsheet-backed baby name
//! popularity API.
//!
//! The [`Api`] type downloads [`NameRecord`]s; the [`model`] module turns them
//! into a name catalog and a per-name rank chart.

#![deny(missing_docs)]
#![warn(unused)]

pub mod api;
pub mod cache;
pub mod model;

pub use api::Api;
pub use api::Source;
pub use model::NameRecord;
