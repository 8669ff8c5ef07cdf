// crates/mdr-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and bounded input reads.
// Purpose: Ensure the command surface parses as documented and reads fail closed.
// Dependencies: mdr-cli main helpers, clap, tempfile
// ============================================================================

//! ## Overview
//! Validates the clap definitions, the action and kind conversions, and the
//! size limit enforced by `read_bytes_with_limit`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use clap::CommandFactory;
use clap::Parser;
use mdr_core::EntityKind;
use mdr_core::ObjectAction;
use tempfile::NamedTempFile;

use super::Cli;
use super::Commands;
use super::LifecycleCommand;
use super::ReadLimitError;
use super::ReplayActionArg;
use super::TemplateCommand;
use super::kind_arg;
use super::read_bytes_with_limit;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn temp_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content).expect("write temp file");
    file
}

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn replay_parses_actions_in_order_with_defaults() {
    let cli = Cli::try_parse_from(["mdr", "lifecycle", "replay", "edit", "approve", "new-version"])
        .expect("parse replay");
    let Some(Commands::Lifecycle {
        command: LifecycleCommand::Replay(command),
    }) = cli.command
    else {
        panic!("expected lifecycle replay");
    };
    assert_eq!(
        command.actions,
        vec![ReplayActionArg::Edit, ReplayActionArg::Approve, ReplayActionArg::NewVersion]
    );
    assert_eq!(command.kind, EntityKind::Activity);
    assert!(!command.in_use);
}

#[test]
fn replay_requires_at_least_one_action() {
    assert!(Cli::try_parse_from(["mdr", "lifecycle", "replay"]).is_err());
}

#[test]
fn replay_rejects_unknown_action() {
    assert!(Cli::try_parse_from(["mdr", "lifecycle", "replay", "publish"]).is_err());
}

#[test]
fn global_config_flag_follows_subcommands() {
    let cli = Cli::try_parse_from(["mdr", "template", "check", "[Drug]", "--config", "alt.toml"])
        .expect("parse check");
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("alt.toml")));
    let Some(Commands::Template {
        command: TemplateCommand::Check(command),
    }) = cli.command
    else {
        panic!("expected template check");
    };
    assert_eq!(command.text, "[Drug]");
}

#[test]
fn action_args_map_onto_object_actions() {
    let pairs = [
        (ReplayActionArg::Approve, ObjectAction::Approve),
        (ReplayActionArg::Edit, ObjectAction::Edit),
        (ReplayActionArg::NewVersion, ObjectAction::NewVersion),
        (ReplayActionArg::Inactivate, ObjectAction::Inactivate),
        (ReplayActionArg::Reactivate, ObjectAction::Reactivate),
        (ReplayActionArg::Delete, ObjectAction::Delete),
    ];
    for (arg, action) in pairs {
        assert_eq!(ObjectAction::from(arg), action);
    }
}

#[test]
fn kind_arg_accepts_configuration_names_only() {
    assert_eq!(kind_arg("objective_template"), Ok(EntityKind::ObjectiveTemplate));
    let err = kind_arg("ObjectiveTemplate").expect_err("display names are not accepted");
    assert!(err.contains("Unknown entity kind 'ObjectiveTemplate'"));
    assert!(err.contains("unit_definition"));
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let file = temp_file(b"ok");
    let bytes = read_bytes_with_limit(file.path(), 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_allows_file_at_limit() {
    let file = temp_file(&[b'x'; 8]);
    let bytes = read_bytes_with_limit(file.path(), 8).expect("read file at limit");
    assert_eq!(bytes.len(), 8);
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let limit = 8_usize;
    let file = temp_file(&vec![0_u8; limit + 1]);

    let err = read_bytes_with_limit(file.path(), limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge {
            size,
            limit: reported,
        } => {
            let limit_u64 = u64::try_from(limit).expect("limit fits");
            assert!(size > limit_u64);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }
}

#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_bytes_with_limit(&dir.path().join("absent.json"), 16)
        .expect_err("missing file must fail");
    assert!(matches!(err, ReadLimitError::Io(_)));
}
