// crates/mdr-core/tests/service.rs
// ============================================================================
// Module: Library Service Tests
// Description: Load-apply-save behavior of the service boundary.
// Purpose: Ensure rejected and no-op operations never reach storage.
// Dependencies: mdr-core
// ============================================================================

//! Service transaction boundary tests.

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

mod support;

use std::cell::Cell;

use mdr_core::ConceptValue;
use mdr_core::EntityKind;
use mdr_core::InMemoryItemRepository;
use mdr_core::ItemRepository;
use mdr_core::ItemStatus;
use mdr_core::ItemUid;
use mdr_core::LibraryError;
use mdr_core::LibraryService;
use mdr_core::LifecycleCommand;
use mdr_core::PortError;
use mdr_core::SemVer;
use mdr_core::VersionedItem;
use mdr_core::VersioningError;
use support::Harness;
use support::TestResult;
use support::author;
use support::concept;
use support::ensure;
use support::sponsor_library;
use time::Duration;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Repository wrapper that counts saves.
struct CountingRepository<'a> {
    /// Wrapped store.
    inner: &'a InMemoryItemRepository<ConceptValue>,
    /// Number of successful saves.
    saves: Cell<usize>,
}

impl<'a> CountingRepository<'a> {
    /// Wraps a store.
    fn new(inner: &'a InMemoryItemRepository<ConceptValue>) -> Self {
        Self {
            inner,
            saves: Cell::new(0),
        }
    }
}

impl ItemRepository<ConceptValue> for CountingRepository<'_> {
    fn find_by_uid(
        &self,
        uid: &ItemUid,
        for_update: bool,
    ) -> Result<Option<VersionedItem<ConceptValue>>, PortError> {
        assert!(for_update, "service loads must lock the item");
        self.inner.find_by_uid(uid, for_update)
    }

    fn save(&self, item: &VersionedItem<ConceptValue>) -> Result<(), PortError> {
        self.saves.set(self.saves.get() + 1);
        self.inner.save(item)
    }
}

/// Repository that keeps serving a snapshot taken before other writers saved.
struct SnapshotRepository<'a> {
    /// Wrapped store that receives the saves.
    inner: &'a InMemoryItemRepository<ConceptValue>,
    /// Stale state returned by every load.
    snapshot: VersionedItem<ConceptValue>,
}

impl ItemRepository<ConceptValue> for SnapshotRepository<'_> {
    fn find_by_uid(
        &self,
        _uid: &ItemUid,
        _for_update: bool,
    ) -> Result<Option<VersionedItem<ConceptValue>>, PortError> {
        Ok(Some(self.snapshot.clone()))
    }

    fn save(&self, item: &VersionedItem<ConceptValue>) -> Result<(), PortError> {
        self.inner.save(item)
    }
}

/// Version numbers of every stored record, oldest first.
fn stored_versions(harness: &Harness<ConceptValue>, uid: &ItemUid) -> TestResult<Vec<String>> {
    let records = harness.repository.versions(uid)?;
    Ok(records.iter().map(|record| record.version().to_string()).collect())
}

/// Creates an activity through the service.
fn create(service: &LibraryService<'_, ConceptValue>, name: &str) -> ItemUid {
    service
        .create(
            EntityKind::Activity,
            EntityKind::Activity.default_policy(),
            sponsor_library(),
            concept(name),
            author(),
        )
        .unwrap()
        .uid()
        .clone()
}

/// Approve command without a description.
const fn approve() -> LifecycleCommand<ConceptValue> {
    LifecycleCommand::Approve {
        change_description: None,
    }
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

#[test]
fn successful_operations_are_saved_once() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let repository = CountingRepository::new(&harness.repository);
    let service = LibraryService::new(&repository, harness.ports());

    let uid = create(&service, "Weight");
    ensure(repository.saves.get() == 1, "create saves once")?;

    let item = service.apply(&uid, approve(), author())?;
    ensure(item.metadata().version() == SemVer::new(1, 0), "approved to 1.0")?;
    ensure(repository.saves.get() == 2, "approve saves once")?;

    let stored = harness.repository.find_by_uid(&uid, false)?.unwrap();
    ensure(stored.metadata().status() == ItemStatus::Final, "stored item is final")?;
    Ok(())
}

#[test]
fn rejected_operations_are_not_saved() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let repository = CountingRepository::new(&harness.repository);
    let service = LibraryService::new(&repository, harness.ports());
    let uid = create(&service, "Weight");

    let command = LifecycleCommand::Inactivate {
        change_description: None,
    };
    let err = service.apply(&uid, command, author()).unwrap_err();
    ensure(err == LibraryError::Versioning(VersioningError::RetireDraft), "draft cannot retire")?;
    ensure(repository.saves.get() == 1, "nothing saved after rejection")?;

    let stored = harness.repository.find_by_uid(&uid, false)?.unwrap();
    ensure(stored.metadata().version() == SemVer::INITIAL, "stored version untouched")?;
    Ok(())
}

#[test]
fn unchanged_edit_is_not_saved() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let repository = CountingRepository::new(&harness.repository);
    let service = LibraryService::new(&repository, harness.ports());
    let uid = create(&service, "Weight");

    let command = LifecycleCommand::Edit {
        payload: concept("Weight"),
        change_description: Some("No change".into()),
    };
    let item = service.apply(&uid, command, author())?;
    ensure(item.metadata().version() == SemVer::INITIAL, "version not bumped")?;
    ensure(repository.saves.get() == 1, "no-op edit not saved")?;

    let command = LifecycleCommand::Edit {
        payload: concept("Body weight"),
        change_description: Some("Renamed".into()),
    };
    let item = service.apply(&uid, command, author())?;
    ensure(item.metadata().version() == SemVer::new(0, 2), "edit bumps minor")?;
    ensure(repository.saves.get() == 2, "real edit saved")?;
    Ok(())
}

#[test]
fn unknown_uid_is_not_found() {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let err = service.apply(&ItemUid::new("Item_999999"), approve(), author()).unwrap_err();
    assert_eq!(err, LibraryError::NotFound("item Item_999999 does not exist".into()));
}

// ============================================================================
// SECTION: History
// ============================================================================

#[test]
fn repository_keeps_every_closed_version() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let uid = create(&service, "Weight");

    harness.clock.advance(Duration::hours(1));
    service.apply(&uid, approve(), author())?;
    harness.clock.advance(Duration::hours(1));
    service.apply(
        &uid,
        LifecycleCommand::NewVersion {
            change_description: Some("Revise".into()),
        },
        author(),
    )?;
    harness.clock.advance(Duration::hours(1));
    service.apply(&uid, approve(), author())?;

    let versions = harness.repository.versions(&uid)?;
    let numbers: Vec<String> =
        versions.iter().map(|record| record.version().to_string()).collect();
    ensure(numbers == ["0.1", "1.0", "2.0", "3.0"], format!("unexpected history {numbers:?}"))?;
    ensure(
        versions[.. versions.len() - 1].iter().all(|record| !record.is_current()),
        "only the last record is open",
    )?;
    for pair in versions.windows(2) {
        ensure(pair[0].end_date() == Some(pair[1].start_date()), "records are contiguous")?;
    }
    Ok(())
}

#[test]
fn deleted_items_stay_in_the_store() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let uid = create(&service, "Weight");

    let item = service.apply(&uid, LifecycleCommand::Delete, author())?;
    ensure(item.is_deleted(), "item flagged deleted")?;
    ensure(item.possible_actions().is_empty(), "deleted item offers no actions")?;

    let err = service.apply(&uid, approve(), author()).unwrap_err();
    ensure(
        err == LibraryError::BusinessLogic("cannot use deleted object".into()),
        "deleted is unusable",
    )?;

    let recreated = create(&service, "Weight");
    ensure(recreated != uid, "name is free again after deletion")?;
    Ok(())
}

// ============================================================================
// SECTION: Write Conflicts
// ============================================================================

#[test]
fn stale_save_is_rejected_and_keeps_the_winning_history() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let uid = create(&service, "Weight");

    let mut winner = harness.repository.find_by_uid(&uid, true)?.unwrap();
    let mut stale = harness.repository.find_by_uid(&uid, true)?.unwrap();
    harness.clock.advance(Duration::hours(1));
    winner.approve(author(), None, &harness.ports())?;
    harness.repository.save(&winner)?;

    harness.clock.advance(Duration::hours(1));
    stale.edit_draft(concept("Body weight"), author(), None, &harness.ports())?;
    let err = harness.repository.save(&stale).unwrap_err();
    ensure(matches!(err, PortError::Conflict(_)), format!("unexpected error {err:?}"))?;

    let versions = stored_versions(&harness, &uid)?;
    ensure(versions == ["0.1", "1.0"], format!("unexpected history {versions:?}"))?;
    let stored = harness.repository.find_by_uid(&uid, false)?.unwrap();
    ensure(stored.payload().name == "Weight", "stale payload must not be written")
}

#[test]
fn service_reports_stale_load_as_versioning_error() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let uid = create(&service, "Weight");
    let snapshot = harness.repository.find_by_uid(&uid, true)?.unwrap();

    harness.clock.advance(Duration::hours(1));
    service.apply(&uid, approve(), author())?;

    let stale_repository = SnapshotRepository {
        inner: &harness.repository,
        snapshot,
    };
    let stale_service = LibraryService::new(&stale_repository, harness.ports());
    harness.clock.advance(Duration::hours(1));
    let err = stale_service
        .apply(
            &uid,
            LifecycleCommand::Edit {
                payload: concept("Body weight"),
                change_description: None,
            },
            author(),
        )
        .unwrap_err();
    ensure(
        err == LibraryError::Versioning(VersioningError::StaleVersion),
        format!("unexpected error {err:?}"),
    )?;
    let versions = stored_versions(&harness, &uid)?;
    ensure(versions == ["0.1", "1.0"], format!("unexpected history {versions:?}"))
}

#[test]
fn stale_transition_of_deleted_item_is_rejected() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let service = LibraryService::new(&harness.repository, harness.ports());
    let uid = create(&service, "Weight");
    let snapshot = harness.repository.find_by_uid(&uid, true)?.unwrap();
    service.apply(&uid, LifecycleCommand::Delete, author())?;

    let stale_repository = SnapshotRepository {
        inner: &harness.repository,
        snapshot,
    };
    let stale_service = LibraryService::new(&stale_repository, harness.ports());
    let err = stale_service.apply(&uid, approve(), author()).unwrap_err();
    ensure(
        err == LibraryError::Versioning(VersioningError::StaleVersion),
        format!("unexpected error {err:?}"),
    )?;
    let stored = harness.repository.find_by_uid(&uid, false)?.unwrap();
    ensure(stored.is_deleted(), "item stays deleted")?;
    ensure(stored.metadata().status() == ItemStatus::Draft, "approval was not written")
}

#[test]
fn resaving_an_item_appends_each_record_once() -> TestResult {
    let harness = Harness::<ConceptValue>::new();
    let mut item = VersionedItem::create(
        EntityKind::Activity,
        EntityKind::Activity.default_policy(),
        sponsor_library(),
        concept("Weight"),
        author(),
        &harness.ports(),
    )?;
    let uid = item.uid().clone();
    harness.repository.save(&item)?;

    harness.clock.advance(Duration::hours(1));
    item.approve(author(), None, &harness.ports())?;
    harness.repository.save(&item)?;
    harness.clock.advance(Duration::hours(1));
    item.create_new_version(author(), None, &harness.ports())?;
    harness.repository.save(&item)?;

    let versions = stored_versions(&harness, &uid)?;
    ensure(versions == ["0.1", "1.0", "2.0"], format!("unexpected history {versions:?}"))
}
