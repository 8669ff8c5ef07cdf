// crates/mdr-core/tests/proptest_versioning.rs
// ============================================================================
// Module: Versioning Property-Based Tests
// Description: Random lifecycle sequences against the versioned aggregate.
// Purpose: Check that offered actions, outcomes, and version order agree.
// ============================================================================

//! Property-based tests for lifecycle transitions.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use mdr_core::ConceptValue;
use mdr_core::EntityKind;
use mdr_core::ItemStatus;
use mdr_core::LibraryResult;
use mdr_core::ObjectAction;
use mdr_core::VersionedItem;
use proptest::prelude::*;
use support::Harness;
use support::author;
use support::concept;
use support::sponsor_library;
use time::Duration;

/// Any action a caller may attempt.
fn any_action() -> impl Strategy<Value = ObjectAction> {
    prop_oneof![
        Just(ObjectAction::Approve),
        Just(ObjectAction::Edit),
        Just(ObjectAction::Delete),
        Just(ObjectAction::NewVersion),
        Just(ObjectAction::Inactivate),
        Just(ObjectAction::Reactivate),
    ]
}

/// Attempts one action; edits use a fresh name per step.
fn attempt(
    item: &mut VersionedItem<ConceptValue>,
    action: ObjectAction,
    step: usize,
    harness: &Harness<ConceptValue>,
) -> LibraryResult<()> {
    let ports = harness.ports();
    match action {
        ObjectAction::Approve => item.approve(author(), None, &ports),
        ObjectAction::Edit => item
            .edit_draft(concept(&format!("Activity {step}")), author(), None, &ports)
            .map(|_| ()),
        ObjectAction::Delete => item.soft_delete(&ports),
        ObjectAction::NewVersion => item.create_new_version(author(), None, &ports),
        ObjectAction::Inactivate => item.inactivate(author(), None, &ports),
        ObjectAction::Reactivate => item.reactivate(author(), None, &ports),
    }
}

proptest! {
    #[test]
    fn offered_actions_are_exactly_the_successful_ones(
        actions in prop::collection::vec(any_action(), 1 .. 24),
    ) {
        let harness = Harness::<ConceptValue>::new();
        let mut item = VersionedItem::create(
            EntityKind::Activity,
            EntityKind::Activity.default_policy(),
            sponsor_library(),
            concept("Activity"),
            author(),
            &harness.ports(),
        )
        .unwrap();

        for (step, action) in actions.into_iter().enumerate() {
            harness.clock.advance(Duration::minutes(1));
            let offered = item.possible_actions().contains(&action);
            let before = item.clone();
            let result = attempt(&mut item, action, step, &harness);

            let version = before.metadata().version();
            prop_assert_eq!(result.is_ok(), offered, "{} at {}", action, version);
            if result.is_err() {
                prop_assert_eq!(&item, &before);
            }
            prop_assert!(item.metadata().version() >= before.metadata().version());
            if item.metadata().status() == ItemStatus::Final {
                prop_assert_eq!(item.metadata().version().minor(), 0);
            }
        }
    }

    #[test]
    fn closed_records_form_a_contiguous_timeline(
        actions in prop::collection::vec(any_action(), 1 .. 24),
    ) {
        let harness = Harness::<ConceptValue>::new();
        let mut item = VersionedItem::create(
            EntityKind::Activity,
            EntityKind::Activity.default_policy(),
            sponsor_library(),
            concept("Activity"),
            author(),
            &harness.ports(),
        )
        .unwrap();

        for (step, action) in actions.into_iter().enumerate() {
            harness.clock.advance(Duration::minutes(1));
            let _ = attempt(&mut item, action, step, &harness);
        }

        let mut records = item.history().to_vec();
        records.push(item.metadata().clone());
        for pair in records.windows(2) {
            prop_assert_eq!(pair[0].end_date(), Some(pair[1].start_date()));
            prop_assert!(pair[0].version() <= pair[1].version());
        }
        prop_assert!(item.metadata().is_current());
    }
}
