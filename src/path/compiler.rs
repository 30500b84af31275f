//! Path string parser

use crate::error::{Error, Result};
use crate::variables::NameResolver;
use std::fmt;

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Key lookup in a document
    Field(String),
    /// Element lookup in an array
    Index(i64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Immutable, reusable parsed path.
///
/// Traversal never mutates the segment list, so one compiled path can be
/// shared by any number of concurrent projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    segments: Vec<PathSegment>,
}

impl CompiledPath {
    /// Compile a path, resolving variables through `resolver`
    pub fn compile(path: &str, resolver: &dyn NameResolver) -> Result<Self> {
        FieldPathCompiler::new(resolver).compile(path)
    }

    /// Segments in traversal order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Segment at `cursor`, or None once the path is exhausted
    pub fn segment(&self, cursor: usize) -> Option<&PathSegment> {
        self.segments.get(cursor)
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path addresses the record root itself
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Parses path strings into `CompiledPath`s
pub struct FieldPathCompiler<'a> {
    resolver: &'a dyn NameResolver,
}

impl<'a> FieldPathCompiler<'a> {
    /// Create a compiler using `resolver` for variable substitution
    pub fn new(resolver: &'a dyn NameResolver) -> Self {
        Self { resolver }
    }

    /// Compile a path string.
    ///
    /// A leading `$` is dropped, `.` separates field names and every
    /// `[n]` suffix becomes an index segment. Each piece of raw text is
    /// resolved before it is frozen.
    pub fn compile(&self, path: &str) -> Result<CompiledPath> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(Error::config("Field path cannot be empty"));
        }

        let body = if trimmed.starts_with("${") {
            trimmed
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed)
        };
        let mut segments = Vec::new();

        for (position, part) in split_parts(body).into_iter().enumerate() {
            if part.is_empty() {
                // `$.a` splits into an empty leading part
                if position == 0 {
                    continue;
                }
                return Err(Error::config(format!(
                    "Empty field name in path '{trimmed}'"
                )));
            }
            self.compile_part(part, position, trimmed, &mut segments)?;
        }

        Ok(CompiledPath { segments })
    }

    /// Compile `name[i][j]...` into its segments
    fn compile_part(
        &self,
        part: &str,
        position: usize,
        path: &str,
        segments: &mut Vec<PathSegment>,
    ) -> Result<()> {
        let (name, mut brackets) = match find_unnested(part, '[') {
            Some(open) => part.split_at(open),
            None => (part, ""),
        };

        if name.is_empty() {
            // Only the document root may start with an index
            if position != 0 {
                return Err(Error::config(format!(
                    "Array index without field name in path '{path}'"
                )));
            }
        } else {
            segments.push(PathSegment::Field(self.resolver.resolve(name)));
        }

        while !brackets.is_empty() {
            let inner_and_rest = brackets.strip_prefix('[').ok_or_else(|| {
                Error::config(format!("Unexpected text '{brackets}' in path '{path}'"))
            })?;
            let close = find_unnested(inner_and_rest, ']').ok_or_else(|| {
                Error::config(format!("Unterminated array index in path '{path}'"))
            })?;

            let raw = &inner_and_rest[..close];
            let resolved = self.resolver.resolve(raw);
            let index = resolved.trim().parse::<i64>().map_err(|_| {
                Error::config(format!(
                    "Invalid array index '{resolved}' in path '{path}'"
                ))
            })?;
            segments.push(PathSegment::Index(index));

            brackets = &inner_and_rest[close + 1..];
        }

        Ok(())
    }
}

/// Split on `.` outside `${...}` references and `[...]` brackets
fn split_parts(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut variables = 0usize;
    let mut brackets = 0usize;
    let mut start = 0;
    let bytes = body.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' if i > 0 && bytes[i - 1] == b'$' => variables += 1,
            b'}' if variables > 0 => variables -= 1,
            b'[' if variables == 0 => brackets += 1,
            b']' if variables == 0 => brackets = brackets.saturating_sub(1),
            b'.' if variables == 0 && brackets == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Byte offset of `target` outside any `${...}` reference
fn find_unnested(s: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut previous = None;
    for (i, c) in s.char_indices() {
        match c {
            '{' if previous == Some('$') => depth += 1,
            '}' if depth > 0 => depth -= 1,
            c if c == target && depth == 0 => return Some(i),
            _ => {}
        }
        previous = Some(c);
    }
    None
}
