//! Value projection module
//!
//! Extracts exactly one typed value per output column from a record.
//!
//! # Overview
//!
//! - `OutputField` - compiled path, declared type and optional indexed domain
//! - `ValueProjector` - walks a record along a compiled path with an explicit
//!   cursor; shape mismatches (missing key, index out of range, field lookup
//!   on a scalar) resolve to null
//! - `coerce` - converts the addressed leaf to the declared type

mod coerce;
mod projector;
mod types;

pub use coerce::coerce;
pub use projector::ValueProjector;
pub use types::{OutputField, ProjectedValue, Row};

#[cfg(test)]
mod tests;
