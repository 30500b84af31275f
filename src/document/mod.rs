//! Document model
//!
//! The tree-shaped records produced by a document source.
//!
//! # Overview
//!
//! - `RawValue` - closed tagged variant for every node of a sampled record
//! - `RawNumber` - integer, double or decimal numeric leaf
//! - JSON conversion, including the extended-JSON wrappers (`$date`,
//!   `$binary`, `$numberLong`, `$numberDecimal`, `$oid`, ...) emitted by
//!   document stores

mod convert;
mod types;

pub use convert::parse_json_record;
pub(crate) use convert::{format_datetime, millis_to_datetime};
pub use types::{RawNumber, RawValue};

#[cfg(test)]
mod tests;
