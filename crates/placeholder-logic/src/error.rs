// crates/placeholder-logic/src/error.rs
// ============================================================================
// Module: Placeholder Error Definitions
// Description: Structured diagnostics for template placeholder scanning.
// Purpose: Report the first syntax violation with a byte offset.
// Dependencies: serde::{Serialize, Deserialize}, std::fmt
// ============================================================================

//! ## Overview
//! Centralizes the placeholder syntax errors and their user-facing messages so
//! template authoring surfaces can point at the offending bracket.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Errors that can occur while scanning or filling a template string.
///
/// Positions are byte offsets into the original input.
///
/// # Invariants
/// - None. Variants capture structured scan failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaceholderError {
    // ============================================================================
    // SECTION: Input Errors
    // ============================================================================
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the configured size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },

    // ============================================================================
    // SECTION: Bracket Errors
    // ============================================================================
    /// A `[` was found while another placeholder was still open.
    NestedBracket {
        /// Offset of the nested `[`.
        position: usize,
    },
    /// A placeholder closed without any interior characters.
    EmptyPlaceholder {
        /// Offset of the closing `]`.
        position: usize,
    },
    /// A `]` was found with no open placeholder.
    UnmatchedClose {
        /// Offset of the stray `]`.
        position: usize,
    },
    /// Input ended while a placeholder was still open.
    UnclosedBracket {
        /// Offset of the `[` that was never closed.
        position: usize,
    },

    // ============================================================================
    // SECTION: Substitution Errors
    // ============================================================================
    /// The number of substitution values does not match the placeholders.
    ArityMismatch {
        /// Placeholders found in the template.
        expected: usize,
        /// Values supplied by the caller.
        actual: usize,
    },
}

impl fmt::Display for PlaceholderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "template is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "template exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestedBracket {
                position,
            } => write!(f, "nested `[` at {position}"),
            Self::EmptyPlaceholder {
                position,
            } => write!(f, "empty placeholder `[]` closed at {position}"),
            Self::UnmatchedClose {
                position,
            } => write!(f, "unmatched `]` at {position}"),
            Self::UnclosedBracket {
                position,
            } => write!(f, "unclosed `[` opened at {position}"),
            Self::ArityMismatch {
                expected,
                actual,
            } => {
                write!(f, "template has {expected} placeholders but {actual} values were supplied")
            }
        }
    }
}

impl std::error::Error for PlaceholderError {}

/// Convenient Result type for placeholder operations.
pub type PlaceholderResult<T> = Result<T, PlaceholderError>;
