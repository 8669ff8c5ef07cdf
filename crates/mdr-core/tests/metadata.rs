// crates/mdr-core/tests/metadata.rs
// ============================================================================
// Module: Item Metadata Tests
// Description: Transition table, version parsing, and persisted record checks.
// Purpose: Pin the pure rules that the aggregate builds on.
// Dependencies: mdr-core, serde_json, time
// ============================================================================

//! Metadata and version rule tests.

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

use std::collections::BTreeSet;

use mdr_core::AuthorId;
use mdr_core::ItemMetadata;
use mdr_core::ItemStatus;
use mdr_core::LibraryError;
use mdr_core::ObjectAction;
use mdr_core::SemVer;
use mdr_core::VersioningError;
use mdr_core::possible_actions;
use time::Duration;
use time::macros::datetime;

// ============================================================================
// SECTION: SemVer
// ============================================================================

#[test]
fn versions_compare_numerically() {
    assert!(SemVer::new(1, 10) > SemVer::new(1, 9));
    assert!(SemVer::new(2, 0) > SemVer::new(1, 99));
    assert_eq!(SemVer::new(1, 3).increment_minor(), SemVer::new(1, 4));
    assert_eq!(SemVer::new(1, 3).increment_major(), SemVer::new(2, 0));
}

#[test]
fn versions_parse_strictly() {
    assert_eq!("1.10".parse::<SemVer>().unwrap(), SemVer::new(1, 10));
    assert_eq!(SemVer::new(0, 1).to_string(), "0.1");
    for bad in ["", "1", "1.", ".1", "1.2.3", "-1.0", "+1.0", "1 .0", "a.b"] {
        assert!(bad.parse::<SemVer>().is_err(), "{bad} must be rejected");
    }
}

#[test]
fn versions_serialize_as_strings() {
    let json = serde_json::to_string(&SemVer::new(3, 2)).unwrap();
    assert_eq!(json, "\"3.2\"");
    let parsed: SemVer = serde_json::from_str("\"4.0\"").unwrap();
    assert_eq!(parsed, SemVer::new(4, 0));
    assert!(serde_json::from_str::<SemVer>("\"4\"").is_err());
}

// ============================================================================
// SECTION: Possible Actions
// ============================================================================

#[test]
fn possible_actions_follow_status_and_major() {
    assert_eq!(
        possible_actions(ItemStatus::Draft, 0),
        BTreeSet::from([ObjectAction::Approve, ObjectAction::Edit, ObjectAction::Delete])
    );
    assert_eq!(
        possible_actions(ItemStatus::Draft, 3),
        BTreeSet::from([ObjectAction::Approve, ObjectAction::Edit])
    );
    assert_eq!(
        possible_actions(ItemStatus::Final, 1),
        BTreeSet::from([ObjectAction::NewVersion, ObjectAction::Inactivate])
    );
    assert_eq!(
        possible_actions(ItemStatus::Retired, 2),
        BTreeSet::from([ObjectAction::Reactivate])
    );
}

// ============================================================================
// SECTION: Transitions
// ============================================================================

#[test]
fn transitions_are_pure() {
    let start = datetime!(2026-02-01 08:00 UTC);
    let draft = ItemMetadata::initial(AuthorId::new("a"), start);
    let later = start + Duration::minutes(5);

    let edited = draft.new_draft_for_edit(AuthorId::new("b"), None, later).unwrap();
    assert_eq!(edited.version(), SemVer::new(0, 2));
    assert_eq!(edited.author_id().as_str(), "b");
    assert_eq!(draft.version(), SemVer::INITIAL);

    let approved = edited.approve(AuthorId::new("c"), Some("Ready"), later).unwrap();
    assert_eq!(approved.version(), SemVer::new(1, 0));
    assert_eq!(approved.change_description(), "Ready");

    let next_draft = approved.new_draft_for_edit(AuthorId::new("c"), None, later).unwrap();
    assert_eq!(next_draft.version(), SemVer::new(2, 0));
    assert_eq!(next_draft.status(), ItemStatus::Draft);
}

#[test]
fn retired_version_cannot_open_a_draft() {
    let start = datetime!(2026-02-01 08:00 UTC);
    let retired = ItemMetadata::initial(AuthorId::new("a"), start)
        .approve(AuthorId::new("a"), None, start)
        .and_then(|record| record.retire(AuthorId::new("a"), None, start))
        .unwrap();
    assert_eq!(
        retired.new_draft_for_edit(AuthorId::new("a"), None, start),
        Err(VersioningError::DraftFromRetired)
    );
    assert_eq!(retired.check_deletable(), Err(VersioningError::Accepted));
}

#[test]
fn successor_never_starts_before_its_predecessor() {
    let start = datetime!(2026-02-01 08:00 UTC);
    let draft = ItemMetadata::initial(AuthorId::new("a"), start);
    let approved = draft.approve(AuthorId::new("a"), None, start - Duration::hours(1)).unwrap();
    assert_eq!(approved.start_date(), start);
}

#[test]
fn versioning_errors_have_stable_codes() {
    assert_eq!(VersioningError::NotDraft.code(), "invalid_status_non_draft");
    assert_eq!(VersioningError::NotFinal.code(), "invalid_status_non_final");
    assert_eq!(VersioningError::Accepted.code(), "object_accepted");
    assert_eq!(VersioningError::ParametersFrozen.code(), "parameters_frozen");
    assert_eq!(
        VersioningError::ParametersFrozen.to_string(),
        "cannot change number or order of template parameters"
    );
}

// ============================================================================
// SECTION: Persisted Records
// ============================================================================

#[test]
fn repository_values_are_validated() {
    let start = datetime!(2026-02-01 08:00 UTC);
    let invalid_version = ItemMetadata::from_repository_values(
        ItemStatus::Draft,
        SemVer::new(0, 0),
        AuthorId::new("a"),
        "Initial version",
        start,
        None,
    );
    assert!(matches!(invalid_version, Err(LibraryError::Validation(_))));

    let inverted_dates = ItemMetadata::from_repository_values(
        ItemStatus::Final,
        SemVer::new(1, 0),
        AuthorId::new("a"),
        "Approved version",
        start,
        Some(start - Duration::seconds(1)),
    );
    assert!(matches!(inverted_dates, Err(LibraryError::Validation(_))));

    let closed = ItemMetadata::from_repository_values(
        ItemStatus::Final,
        SemVer::new(1, 0),
        AuthorId::new("a"),
        "Approved version",
        start,
        Some(start),
    )
    .unwrap();
    assert!(!closed.is_current());
}

#[test]
fn metadata_round_trips_through_rfc3339_json() {
    let start = datetime!(2026-02-01 08:00 UTC);
    let record = ItemMetadata::initial(AuthorId::new("a"), start);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["status"], "Draft");
    assert_eq!(json["version"], "0.1");
    assert_eq!(json["start_date"], "2026-02-01T08:00:00Z");
    assert!(json["end_date"].is_null());
    let parsed: ItemMetadata = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, record);
}
