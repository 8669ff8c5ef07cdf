// crates/mdr-cli/src/tests/logging.rs
// ============================================================================
// Module: CLI Logging Tests
// Description: Unit tests for filter directive selection.
// Purpose: Ensure the environment override wins only when it is non-blank.
// Dependencies: mdr-cli logging module, mdr-config
// ============================================================================

//! ## Overview
//! Exercises `env_filter` without installing a global subscriber.

use mdr_config::LoggingConfig;

use crate::logging::LoggingError;
use crate::logging::env_filter;

fn config(filter: &str) -> LoggingConfig {
    LoggingConfig {
        filter: filter.to_string(),
        ..LoggingConfig::default()
    }
}

#[test]
fn configured_filter_applies_without_override() {
    let filter = env_filter(&config("mdr_core=debug"), None).unwrap();
    assert_eq!(filter.to_string(), "mdr_core=debug");
}

#[test]
fn environment_override_wins() {
    let filter = env_filter(&config("info"), Some("mdr_cli=trace")).unwrap();
    assert_eq!(filter.to_string(), "mdr_cli=trace");
}

#[test]
fn blank_override_is_ignored() {
    let filter = env_filter(&config("warn"), Some("   ")).unwrap();
    assert_eq!(filter.to_string(), "warn");
}

#[test]
fn invalid_directive_is_reported() {
    let err = env_filter(&config("info"), Some("mdr_core=loud")).unwrap_err();
    match err {
        LoggingError::InvalidFilter {
            filter,
            ..
        } => assert_eq!(filter, "mdr_core=loud"),
        LoggingError::Install(message) => panic!("unexpected install error: {message}"),
    }
}
