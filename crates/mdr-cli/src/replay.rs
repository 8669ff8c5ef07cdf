// crates/mdr-cli/src/replay.rs
// ============================================================================
// Module: CLI Lifecycle Replay
// Description: Replays lifecycle actions against a throwaway library item.
// Purpose: Back `mdr lifecycle replay` with the real service and policies.
// Dependencies: mdr-core, mdr-config, serde, thiserror, time, tracing
// ============================================================================

//! ## Overview
//! A replay creates one concept item in an editable in-memory library, then
//! applies each action in order through [`LibraryService`]. The item policy
//! comes from the loaded config, so entity overrides change what a replay
//! accepts. A deterministic clock advances one hour per step, which keeps
//! the reported history reproducible.
//!
//! The first rejected action stops the replay. Nothing after it is applied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use mdr_config::MdrConfig;
use mdr_core::AuthorId;
use mdr_core::Collaborators;
use mdr_core::ConceptValue;
use mdr_core::EntityKind;
use mdr_core::FixedClock;
use mdr_core::InMemoryItemRepository;
use mdr_core::ItemMetadata;
use mdr_core::ItemUid;
use mdr_core::Library;
use mdr_core::LibraryError;
use mdr_core::LibraryService;
use mdr_core::LifecycleCommand;
use mdr_core::ObjectAction;
use mdr_core::PortError;
use mdr_core::SequentialUidGenerator;
use serde::Serialize;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;
use tracing::info;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Clock start of every replay.
pub const REPLAY_EPOCH: OffsetDateTime = datetime!(2026-01-05 09:00 UTC);
/// Clock advance before each step.
pub const REPLAY_STEP: Duration = Duration::hours(1);
/// Name of the replay item when none is given.
pub const DEFAULT_ITEM_NAME: &str = "Systolic blood pressure";
/// Library holding the replay item.
const REPLAY_LIBRARY: &str = "Sponsor";
/// Author recorded on every transition.
const REPLAY_AUTHOR: &str = "mdr-cli";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Replay parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Kind whose policy governs the item.
    pub kind: EntityKind,
    /// Item name.
    pub name: String,
    /// Marks the item as referenced before the first step.
    pub in_use: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            kind: EntityKind::Activity,
            name: DEFAULT_ITEM_NAME.to_string(),
            in_use: false,
        }
    }
}

/// Final state of a completed replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Item identifier.
    pub uid: ItemUid,
    /// Item kind.
    pub kind: EntityKind,
    /// Whether the last step deleted the item.
    pub deleted: bool,
    /// Every metadata record, oldest first; the last one is current.
    pub versions: Vec<ItemMetadata>,
    /// Actions available on the final state.
    pub possible_actions: BTreeSet<ObjectAction>,
}

/// Replay failures.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The replay item could not be created.
    #[error("item creation rejected: {0}")]
    Setup(LibraryError),
    /// An action was rejected.
    #[error("step {step} ({action}) rejected: {source}")]
    Rejected {
        /// One-based step number.
        step: usize,
        /// Rejected action.
        action: ObjectAction,
        /// Rejection reason.
        source: LibraryError,
    },
    /// The in-memory store failed.
    #[error(transparent)]
    Store(#[from] PortError),
}

// ============================================================================
// SECTION: Kind Parsing
// ============================================================================

/// Resolves an entity kind from its configuration name.
#[must_use]
pub fn parse_entity_kind(value: &str) -> Option<EntityKind> {
    EntityKind::ALL.into_iter().find(|kind| kind.as_str() == value)
}

/// Comma-separated list of every configuration name.
#[must_use]
pub fn entity_kind_names() -> String {
    EntityKind::ALL.map(EntityKind::as_str).join(", ")
}

// ============================================================================
// SECTION: Replay
// ============================================================================

/// Creates an item and applies `actions` in order.
///
/// # Errors
///
/// Returns [`ReplayError::Setup`] when the item cannot be created,
/// [`ReplayError::Rejected`] for the first rejected action, and
/// [`ReplayError::Store`] when the in-memory store fails.
pub fn replay(
    actions: &[ObjectAction],
    options: &ReplayOptions,
    config: &MdrConfig,
) -> Result<ReplayReport, ReplayError> {
    let repository = InMemoryItemRepository::<ConceptValue>::new();
    let uids = SequentialUidGenerator::new(options.kind.as_str());
    let clock = FixedClock::new(REPLAY_EPOCH);
    let rules = config.template_rules();
    let ports = Collaborators {
        uid_generator: &uids,
        uniqueness: &repository,
        usage: &repository,
        clock: &clock,
        rules: &rules,
    };
    let service = LibraryService::new(&repository, ports);
    let author = AuthorId::new(REPLAY_AUTHOR);

    let mut item = service
        .create(
            options.kind,
            config.policy_table().policy(options.kind),
            Library::new(REPLAY_LIBRARY, true),
            ConceptValue::new(options.name.clone()),
            author.clone(),
        )
        .map_err(ReplayError::Setup)?;
    let uid = item.uid().clone();
    if options.in_use {
        repository.mark_in_use(&uid)?;
    }

    for (index, action) in actions.iter().copied().enumerate() {
        let step = index + 1;
        clock.advance(REPLAY_STEP);
        let command = command_for(action, step, &options.name);
        item = service.apply(&uid, command, author.clone()).map_err(|source| {
            ReplayError::Rejected {
                step,
                action,
                source,
            }
        })?;
        info!(step, %action, version = %item.metadata().version(), "replay step applied");
    }

    Ok(ReplayReport {
        versions: repository.versions(&uid)?,
        uid,
        kind: options.kind,
        deleted: item.is_deleted(),
        possible_actions: item.possible_actions(),
    })
}

/// Builds the command for one step.
///
/// Edits set a step-specific definition so that no edit is a no-op.
fn command_for(action: ObjectAction, step: usize, name: &str) -> LifecycleCommand<ConceptValue> {
    let change_description = Some(format!("replay step {step}"));
    match action {
        ObjectAction::Edit => LifecycleCommand::Edit {
            payload: ConceptValue::new(name).with_definition(format!("Revision {step}")),
            change_description,
        },
        ObjectAction::Approve => LifecycleCommand::Approve {
            change_description,
        },
        ObjectAction::NewVersion => LifecycleCommand::NewVersion {
            change_description,
        },
        ObjectAction::Inactivate => LifecycleCommand::Inactivate {
            change_description,
        },
        ObjectAction::Reactivate => LifecycleCommand::Reactivate {
            change_description,
        },
        ObjectAction::Delete => LifecycleCommand::Delete,
    }
}
