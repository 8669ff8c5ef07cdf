// crates/mdr-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides the message catalog and translation utilities.
// Purpose: Centralize user-facing strings of the mdr binary.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line the `mdr` binary prints, apart from JSON documents, comes from
//! this catalog. Runtime output is routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholder substitutions apply in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
pub(crate) const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "mdr {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.serialize_failed", "Failed to serialize {kind}: {error}"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.parse_failed", "Failed to parse {kind} at {path}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.check.ok", "Config valid."),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
    ("template.check.valid", "Template valid: {count} placeholder(s)."),
    ("template.check.placeholder", "  [{name}] at {start}..{end}"),
    ("template.check.plain", "Plain text: {text}"),
    ("template.check.invalid", "Template invalid: {error}"),
    ("template.render.failed", "Failed to render template: {error}"),
    ("lifecycle.kind.unknown", "Unknown entity kind '{kind}'. Expected one of: {expected}"),
    ("lifecycle.replay.failed", "Lifecycle replay failed: {error}"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Resolves a catalog key and substitutes `{placeholder}` arguments.
///
/// Unknown keys are returned verbatim.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static English catalog used by the CLI.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
