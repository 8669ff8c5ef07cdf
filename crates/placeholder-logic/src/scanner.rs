// crates/placeholder-logic/src/scanner.rs
// ============================================================================
// Module: Placeholder Scanner
// Description: Single-pass bracket scanner for template strings.
// Purpose: Validate placeholder syntax and extract placeholder names in order.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//!
//! Templates are free text with bracketed parameter slots, for example
//! `"Measure [Activity] at [Visit]"`. The scanner walks the input once with a
//! two-state automaton (outside a placeholder, inside one) and fails on the
//! first violation:
//!
//! - the input must contain at least one non-whitespace character,
//! - brackets never nest (`[a[b]c]` is rejected),
//! - every `]` closes a placeholder with at least one interior character
//!   (`[]` is rejected),
//! - every `[` is closed before the input ends.
//!
//! ### Example
//!
//! ```
//! use placeholder_logic::extract_placeholders;
//! use placeholder_logic::is_syntax_valid;
//!
//! assert!(is_syntax_valid("My [Activity] at [Visit]"));
//! let names = extract_placeholders("My [Activity] at [Visit]").unwrap();
//! assert_eq!(names, vec!["Activity".to_string(), "Visit".to_string()]);
//! ```

use serde::Deserialize;
use serde::Serialize;

use crate::error::PlaceholderError;
use crate::error::PlaceholderResult;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed template size in bytes.
pub const MAX_TEMPLATE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// A placeholder occurrence inside a template string.
///
/// # Invariants
/// - `start` is the offset of the opening `[`; `end` is one past the closing `]`.
/// - `name` is the text strictly between the brackets and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Interior text of the placeholder.
    pub name: String,
    /// Byte offset of the opening bracket.
    pub start: usize,
    /// Byte offset one past the closing bracket.
    pub end: usize,
}

/// Scans a template and returns every placeholder with its span.
///
/// # Errors
/// Returns [`PlaceholderError`] for empty input, oversized input, nested,
/// empty, unmatched or unclosed brackets.
pub fn scan_placeholders(input: &str) -> PlaceholderResult<Vec<Placeholder>> {
    scan_with_limit(input, MAX_TEMPLATE_BYTES)
}

/// Scans a template using an explicit size limit.
///
/// The limit is clamped to [`MAX_TEMPLATE_BYTES`].
///
/// # Errors
/// Returns [`PlaceholderError`] on the first syntax violation.
pub fn scan_with_limit(input: &str, max_bytes: usize) -> PlaceholderResult<Vec<Placeholder>> {
    check_size(input, max_bytes)?;
    if input.trim().is_empty() {
        return Err(PlaceholderError::EmptyInput);
    }
    Scanner::new(input).scan()
}

/// Rejects input above `max_bytes`, clamped to [`MAX_TEMPLATE_BYTES`].
fn check_size(input: &str, max_bytes: usize) -> PlaceholderResult<()> {
    let max_bytes = max_bytes.min(MAX_TEMPLATE_BYTES);
    if input.len() > max_bytes {
        return Err(PlaceholderError::InputTooLarge {
            max_bytes,
            actual_bytes: input.len(),
        });
    }
    Ok(())
}

/// Returns true when the template has valid placeholder syntax.
#[must_use]
pub fn is_syntax_valid(input: &str) -> bool {
    scan_placeholders(input).is_ok()
}

/// Extracts placeholder names in left-to-right order, keeping duplicates.
///
/// Text without brackets, blank text included, yields no names.
///
/// # Errors
/// Returns [`PlaceholderError`] for oversized input or invalid brackets.
pub fn extract_placeholders(input: &str) -> PlaceholderResult<Vec<String>> {
    check_size(input, MAX_TEMPLATE_BYTES)?;
    Ok(Scanner::new(input).scan()?.into_iter().map(|placeholder| placeholder.name).collect())
}

/// Returns true when both templates declare the same placeholders in the same order.
///
/// # Errors
/// Returns [`PlaceholderError`] when either template is invalid.
pub fn same_placeholders(left: &str, right: &str) -> PlaceholderResult<bool> {
    Ok(extract_placeholders(left)? == extract_placeholders(right)?)
}

/// Returns true when `name` is a legal placeholder interior.
///
/// Legal interiors are one or more word, whitespace or hyphen characters and
/// must contain at least one non-whitespace character.
#[must_use]
pub fn is_valid_placeholder_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-' || ch.is_whitespace())
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Automaton state while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Not inside a placeholder.
    Outside,
    /// Inside a placeholder opened at `open`.
    Inside {
        /// Offset of the opening bracket.
        open: usize,
        /// Interior characters seen so far.
        interior: usize,
    },
}

/// Single-pass placeholder scanner.
pub(crate) struct Scanner<'a> {
    /// Source template.
    input: &'a str,
    /// Current automaton state.
    state: ScanState,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of the input.
    pub(crate) const fn new(input: &'a str) -> Self {
        Self {
            input,
            state: ScanState::Outside,
        }
    }

    /// Runs the scan to completion.
    pub(crate) fn scan(&mut self) -> PlaceholderResult<Vec<Placeholder>> {
        let mut placeholders = Vec::new();
        for (position, ch) in self.input.char_indices() {
            if let Some(placeholder) = self.step(position, ch)? {
                placeholders.push(placeholder);
            }
        }
        if let ScanState::Inside {
            open, ..
        } = self.state
        {
            return Err(PlaceholderError::UnclosedBracket {
                position: open,
            });
        }
        Ok(placeholders)
    }

    /// Feeds one character into the automaton.
    pub(crate) fn step(
        &mut self,
        position: usize,
        ch: char,
    ) -> PlaceholderResult<Option<Placeholder>> {
        match (self.state, ch) {
            (ScanState::Outside, '[') => {
                self.state = ScanState::Inside {
                    open: position,
                    interior: 0,
                };
                Ok(None)
            }
            (ScanState::Outside, ']') => Err(PlaceholderError::UnmatchedClose {
                position,
            }),
            (ScanState::Outside, _) => Ok(None),
            (ScanState::Inside { .. }, '[') => Err(PlaceholderError::NestedBracket {
                position,
            }),
            (
                ScanState::Inside {
                    interior: 0, ..
                },
                ']',
            ) => Err(PlaceholderError::EmptyPlaceholder {
                position,
            }),
            (
                ScanState::Inside {
                    open, ..
                },
                ']',
            ) => {
                self.state = ScanState::Outside;
                Ok(Some(Placeholder {
                    name: self.input[open + 1 .. position].to_string(),
                    start: open,
                    end: position + 1,
                }))
            }
            (
                ScanState::Inside {
                    open,
                    interior,
                },
                _,
            ) => {
                self.state = ScanState::Inside {
                    open,
                    interior: interior + 1,
                };
                Ok(None)
            }
        }
    }

    /// Returns the current automaton state.
    #[cfg(test)]
    pub(crate) const fn state(&self) -> ScanState {
        self.state
    }
}
