// crates/mdr-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for the message catalog and substitution.
// Purpose: Ensure catalog lookups are total and substitutions are exact.
// Dependencies: mdr-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog keys are unique, substitution replaces every named
//! placeholder, and unknown keys fall back to the key itself.

use std::collections::BTreeSet;

use crate::i18n::CATALOG_ITEMS;
use crate::i18n::MessageArg;
use crate::i18n::catalog;
use crate::i18n::translate;

#[test]
fn catalog_keys_are_unique() {
    let keys: BTreeSet<&str> = CATALOG_ITEMS.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), CATALOG_ITEMS.len(), "duplicate catalog key");
    assert_eq!(catalog().len(), CATALOG_ITEMS.len());
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "input.read_too_large",
        vec![
            MessageArg::new("kind", "render input"),
            MessageArg::new("path", "big.json"),
            MessageArg::new("size", "2048"),
            MessageArg::new("limit", "1024"),
        ],
    );
    assert_eq!(
        output,
        "Refusing to read render input at big.json because it is 2048 bytes (limit 1024)."
    );
}

#[test]
fn translate_leaves_missing_arguments_visible() {
    let output = translate("config.load_failed", Vec::new());
    assert_eq!(output, "Failed to load config: {error}");
}

#[test]
fn translate_unknown_key_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn macro_formats_display_values() {
    let output = crate::t!("template.check.placeholder", name = "Drug", start = 7, end = 13);
    assert_eq!(output, "  [Drug] at 7..13");
}
