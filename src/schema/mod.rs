//! Schema discovery module
//!
//! Infers a tabular schema of field paths and scalar types from a sample of
//! semi-structured records.
//!
//! # Features
//!
//! - **Path Discovery**: Every leaf of every sampled record is registered
//!   under its canonical path (`$.parent.child`, `$.list[-].name`, `$.tags[0]`)
//! - **Range Merging**: Nested array levels track the `[min:max]` index range
//!   seen across the sample
//! - **Type Inference**: Leaf types follow the document value tag; paths with
//!   differing types fall back to String
//! - **Post-processing**: Ranges collapse to their lower bound, display names
//!   are disambiguated with `_1, _2, ...` and the list is sorted by name

mod discovery;
mod postprocess;
mod types;

pub use discovery::{update_min_max_array_indexes, PathDiscoverer, ROOT};
pub use postprocess::{display_name, minimize_path, post_process};
pub use types::{EmptyArrayPolicy, FieldDescriptor, PathAccumulator, PathRegistry};
