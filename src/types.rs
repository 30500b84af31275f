//! Common types used throughout docschema
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Field Type
// ============================================================================

/// Declared scalar type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text
    #[default]
    String,
    /// 64-bit signed integer
    Integer,
    /// Double precision float
    Number,
    /// Boolean
    Boolean,
    /// UTC timestamp
    Date,
    /// Arbitrary precision decimal
    #[serde(alias = "big_number")]
    BigNumber,
    /// Raw bytes
    Binary,
}

impl FieldType {
    /// All declared types, in display order
    pub const ALL: [FieldType; 7] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::BigNumber,
        FieldType::Binary,
    ];

    /// Parse a type name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::BigNumber => write!(f, "bignumber"),
            FieldType::Binary => write!(f, "binary"),
        }
    }
}

// ============================================================================
// Error Handling Strategy
// ============================================================================

/// Strategy for handling per-record conversion errors during projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Stop on first error
    #[default]
    Fail,
    /// Skip erroring records, continue
    Skip,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle blank strings
pub trait OptionStringExt {
    /// Returns None if the string is empty or whitespace only
    fn none_if_blank(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_blank(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_blank(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
