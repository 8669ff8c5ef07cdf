// crates/mdr-core/src/runtime/service.rs
// ============================================================================
// Module: Library Service
// Description: Transaction boundary around aggregate operations.
// Purpose: Load, apply exactly one operation, and save only on success.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! Each call models one storage transaction: the item is loaded with
//! `for_update = true`, one [`LifecycleCommand`] is applied, and the item is
//! saved once. A rejected operation is logged and nothing is saved. An edit
//! that changes nothing is not saved either. A save rejected because another
//! writer got there first surfaces as [`VersioningError::StaleVersion`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing::warn;

use crate::core::AuthorId;
use crate::core::EntityKind;
use crate::core::ItemPolicy;
use crate::core::ItemUid;
use crate::core::Library;
use crate::core::LibraryError;
use crate::core::LibraryPayload;
use crate::core::LibraryResult;
use crate::core::ObjectAction;
use crate::core::PortError;
use crate::core::VersioningError;
use crate::interfaces::Collaborators;
use crate::interfaces::ItemRepository;
use crate::runtime::EditOutcome;
use crate::runtime::VersionedItem;

// ============================================================================
// SECTION: Commands
// ============================================================================

/// One lifecycle operation on an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand<P> {
    /// Edit the current draft.
    Edit {
        /// Replacement payload.
        payload: P,
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Approve the current draft.
    Approve {
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Open a new draft from a final version.
    NewVersion {
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Open a new draft from a final version with a replacement payload.
    NewVersionWithPayload {
        /// Replacement payload.
        payload: P,
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Retire a final version.
    Inactivate {
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Reactivate a retired version.
    Reactivate {
        /// Optional change description.
        change_description: Option<String>,
    },
    /// Delete a never-approved item.
    Delete,
}

impl<P> LifecycleCommand<P> {
    /// Returns the action the command performs.
    #[must_use]
    pub const fn action(&self) -> ObjectAction {
        match self {
            Self::Edit {
                ..
            } => ObjectAction::Edit,
            Self::Approve {
                ..
            } => ObjectAction::Approve,
            Self::NewVersion {
                ..
            }
            | Self::NewVersionWithPayload {
                ..
            } => ObjectAction::NewVersion,
            Self::Inactivate {
                ..
            } => ObjectAction::Inactivate,
            Self::Reactivate {
                ..
            } => ObjectAction::Reactivate,
            Self::Delete => ObjectAction::Delete,
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Applies lifecycle operations against a repository.
pub struct LibraryService<'a, P> {
    /// Item persistence.
    repository: &'a dyn ItemRepository<P>,
    /// Ports consulted by the aggregate.
    ports: Collaborators<'a>,
}

impl<'a, P: LibraryPayload> LibraryService<'a, P> {
    /// Creates a service over a repository and ports.
    #[must_use]
    pub const fn new(repository: &'a dyn ItemRepository<P>, ports: Collaborators<'a>) -> Self {
        Self {
            repository,
            ports,
        }
    }

    /// Creates and saves a new item.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] when creation is rejected or saving fails.
    pub fn create(
        &self,
        kind: EntityKind,
        policy: ItemPolicy,
        library: Library,
        payload: P,
        author_id: AuthorId,
    ) -> LibraryResult<VersionedItem<P>> {
        let item = VersionedItem::create(kind, policy, library, payload, author_id, &self.ports)
            .inspect_err(|error| warn!(%kind, %error, "library item creation rejected"))?;
        self.repository.save(&item).map_err(save_error)?;
        info!(uid = %item.uid(), %kind, "library item created");
        Ok(item)
    }

    /// Loads an item, applies one command, and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for an unknown uid, the aggregate's
    /// error when the command is rejected, [`VersioningError::StaleVersion`]
    /// when the item changed after loading, and [`LibraryError::Port`] when
    /// loading or saving fails.
    pub fn apply(
        &self,
        uid: &ItemUid,
        command: LifecycleCommand<P>,
        author_id: AuthorId,
    ) -> LibraryResult<VersionedItem<P>> {
        let mut item = self
            .repository
            .find_by_uid(uid, true)?
            .ok_or_else(|| LibraryError::NotFound(format!("item {uid} does not exist")))?;
        let action = command.action();
        let ports = &self.ports;
        let result = match command {
            LifecycleCommand::Edit {
                payload,
                change_description,
            } => item
                .edit_draft(payload, author_id, change_description.as_deref(), ports)
                .map(|outcome| outcome != EditOutcome::Unchanged),
            LifecycleCommand::Approve {
                change_description,
            } => item.approve(author_id, change_description.as_deref(), ports).map(|()| true),
            LifecycleCommand::NewVersion {
                change_description,
            } => item
                .create_new_version(author_id, change_description.as_deref(), ports)
                .map(|()| true),
            LifecycleCommand::NewVersionWithPayload {
                payload,
                change_description,
            } => item
                .create_new_version_with_payload(
                    payload,
                    author_id,
                    change_description.as_deref(),
                    ports,
                )
                .map(|()| true),
            LifecycleCommand::Inactivate {
                change_description,
            } => item.inactivate(author_id, change_description.as_deref(), ports).map(|()| true),
            LifecycleCommand::Reactivate {
                change_description,
            } => item.reactivate(author_id, change_description.as_deref(), ports).map(|()| true),
            LifecycleCommand::Delete => item.soft_delete(ports).map(|()| true),
        };
        let changed = result.inspect_err(|error| {
            warn!(%uid, %action, %error, "library operation rejected");
        })?;
        if changed {
            self.repository.save(&item).map_err(save_error)?;
        }
        info!(
            %uid,
            %action,
            changed,
            version = %item.metadata().version(),
            status = %item.metadata().status(),
            "library operation applied"
        );
        Ok(item)
    }
}

/// Maps a write conflict to the stale-version error.
fn save_error(error: PortError) -> LibraryError {
    match error {
        PortError::Conflict(reason) => {
            warn!(%reason, "stale library write rejected");
            VersioningError::StaleVersion.into()
        }
        other => other.into(),
    }
}
