// crates/placeholder-logic/src/render.rs
// ============================================================================
// Module: Placeholder Rendering
// Description: Ordered substitution and plain-text helpers for templates.
// Purpose: Fill placeholders with values and derive bracket-free names.
// Dependencies: crate::{error, scanner}
// ============================================================================

//! ## Overview
//! Rendering is a positional zip-and-replace: the n-th placeholder receives
//! the n-th value. There are no conditionals or loops. The value count must
//! match the placeholder count exactly.

use crate::error::PlaceholderError;
use crate::error::PlaceholderResult;
use crate::scanner::scan_placeholders;

// ============================================================================
// SECTION: Substitution
// ============================================================================

/// Replaces each placeholder (brackets included) with the matching value.
///
/// # Errors
/// Returns [`PlaceholderError`] when the template is invalid or when the
/// number of values differs from the number of placeholders.
pub fn substitute<S: AsRef<str>>(template: &str, values: &[S]) -> PlaceholderResult<String> {
    let placeholders = scan_placeholders(template)?;
    if placeholders.len() != values.len() {
        return Err(PlaceholderError::ArityMismatch {
            expected: placeholders.len(),
            actual: values.len(),
        });
    }
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    for (placeholder, value) in placeholders.iter().zip(values) {
        output.push_str(&template[cursor .. placeholder.start]);
        output.push_str(value.as_ref());
        cursor = placeholder.end;
    }
    output.push_str(&template[cursor ..]);
    Ok(output)
}

/// Replaces each placeholder with its value wrapped in brackets.
///
/// Instance names keep the brackets so the bound values stay visible.
///
/// # Errors
/// Returns [`PlaceholderError`] under the same conditions as [`substitute`].
pub fn substitute_bracketed<S: AsRef<str>>(
    template: &str,
    values: &[S],
) -> PlaceholderResult<String> {
    let wrapped: Vec<String> = values.iter().map(|value| format!("[{}]", value.as_ref())).collect();
    substitute(template, &wrapped)
}

// ============================================================================
// SECTION: Plain Text
// ============================================================================

/// Removes every square bracket while keeping the interior text.
#[must_use]
pub fn strip_brackets(input: &str) -> String {
    input.chars().filter(|ch| *ch != '[' && *ch != ']').collect()
}

/// Removes markup tags such as `<p>` or `</b>` from the input.
///
/// A `<` that is never closed is kept verbatim.
#[must_use]
pub fn strip_markup(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        output.push_str(&rest[.. open]);
        match rest[open ..].find('>') {
            Some(close) => rest = &rest[open + close + 1 ..],
            None => {
                output.push_str(&rest[open ..]);
                return output;
            }
        }
    }
    output.push_str(rest);
    output
}

/// Derives the plain form of a template or instance name.
///
/// Markup and brackets are removed and runs of whitespace are collapsed.
#[must_use]
pub fn plain_text(input: &str) -> String {
    strip_brackets(&strip_markup(input)).split_whitespace().collect::<Vec<_>>().join(" ")
}
