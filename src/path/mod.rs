//! Field path compilation
//!
//! Parses a stored path string (`$.parent.list[1].name`, `$[0].x`) once into
//! an immutable list of segments that projection walks with a cursor.

mod compiler;

pub use compiler::{CompiledPath, FieldPathCompiler, PathSegment};
