// crates/mdr-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Versioned Item Aggregate
// Description: Generic lifecycle state machine for library items.
// Purpose: Apply create, edit, approve, new-version, retire, reactivate, and
// delete atomically against injected ports.
// Dependencies: crate::{core, interfaces}, serde, tracing
// ============================================================================

//! ## Overview
//! [`VersionedItem`] wraps a payload, its current [`ItemMetadata`], and its
//! library membership. One generic engine serves every entity kind; the
//! kind's [`ItemPolicy`] switches the optional rules on or off.
//!
//! Every operation checks all of its preconditions before it mutates
//! anything, so a failed operation leaves the item unchanged. Successful
//! transitions close the previous metadata record and keep it in
//! [`VersionedItem::history`] until the persistence layer takes it.
//!
//! The aggregate is purely in-memory. Loading and saving belong to the
//! caller, usually [`crate::runtime::LibraryService`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::core::AuthorId;
use crate::core::EntityKind;
use crate::core::ItemMetadata;
use crate::core::ItemPolicy;
use crate::core::ItemStatus;
use crate::core::ItemUid;
use crate::core::Library;
use crate::core::LibraryError;
use crate::core::LibraryPayload;
use crate::core::LibraryResult;
use crate::core::ObjectAction;
use crate::core::SemVer;
use crate::core::VersioningError;
use crate::interfaces::Collaborators;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reason reported by every operation on a deleted item.
pub const DELETED_MESSAGE: &str = "cannot use deleted object";

// ============================================================================
// SECTION: Edit Outcome
// ============================================================================

/// Result of [`VersionedItem::edit_draft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The payload was equal to the current one; nothing changed.
    Unchanged,
    /// A new draft version was recorded.
    Edited {
        /// Version before the edit.
        from: SemVer,
        /// Version after the edit.
        to: SemVer,
    },
}

// ============================================================================
// SECTION: Aggregate
// ============================================================================

/// A versioned library item.
///
/// # Invariants
/// - `uid` never changes after creation.
/// - `metadata` is the only current record; `history` holds records closed
///   since the item was loaded.
/// - Once `deleted` is set every operation fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedItem<P> {
    /// Permanent identifier.
    uid: ItemUid,
    /// Entity flavor.
    kind: EntityKind,
    /// Optional rules for the kind.
    policy: ItemPolicy,
    /// Owning library.
    library: Library,
    /// Current metadata record.
    metadata: ItemMetadata,
    /// Current payload.
    payload: P,
    /// Soft-delete flag.
    #[serde(default)]
    deleted: bool,
    /// Records closed in the current unit of work.
    #[serde(skip)]
    history: Vec<ItemMetadata>,
}

impl<P: LibraryPayload> VersionedItem<P> {
    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Creates a new item in DRAFT 0.1.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::BusinessLogic`] for a locked library,
    /// [`LibraryError::Validation`] for an invalid payload,
    /// [`LibraryError::AlreadyExists`] for a duplicate name, and
    /// [`LibraryError::Port`] when a collaborator fails.
    pub fn create(
        kind: EntityKind,
        policy: ItemPolicy,
        library: Library,
        payload: P,
        author_id: AuthorId,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<Self> {
        library.ensure_editable()?;
        payload.validate(ports.rules)?;
        if policy.unique_name
            && ports.uniqueness.exists_by_name(library.name(), payload.name(), None)?
        {
            return Err(duplicate_name(kind, &library, payload.name()));
        }
        let uid = ports.uid_generator.generate_uid()?;
        let metadata = ItemMetadata::initial(author_id, ports.clock.now());
        debug!(%uid, %kind, version = %metadata.version(), "library item created");
        Ok(Self {
            uid,
            kind,
            policy,
            library,
            metadata,
            payload,
            deleted: false,
            history: Vec::new(),
        })
    }

    /// Rebuilds an item loaded from storage.
    #[must_use]
    pub const fn from_repository_values(
        uid: ItemUid,
        kind: EntityKind,
        policy: ItemPolicy,
        library: Library,
        metadata: ItemMetadata,
        payload: P,
        deleted: bool,
    ) -> Self {
        Self {
            uid,
            kind,
            policy,
            library,
            metadata,
            payload,
            deleted,
            history: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the permanent identifier.
    #[must_use]
    pub const fn uid(&self) -> &ItemUid {
        &self.uid
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the policy in force.
    #[must_use]
    pub const fn policy(&self) -> ItemPolicy {
        self.policy
    }

    /// Returns the owning library.
    #[must_use]
    pub const fn library(&self) -> &Library {
        &self.library
    }

    /// Returns the current metadata record.
    #[must_use]
    pub const fn metadata(&self) -> &ItemMetadata {
        &self.metadata
    }

    /// Returns the current payload.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Returns true once the item has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the records closed since the item was loaded.
    #[must_use]
    pub fn history(&self) -> &[ItemMetadata] {
        &self.history
    }

    /// Removes and returns the closed records.
    pub fn take_history(&mut self) -> Vec<ItemMetadata> {
        std::mem::take(&mut self.history)
    }

    /// Returns the actions available now; empty once deleted.
    #[must_use]
    pub fn possible_actions(&self) -> BTreeSet<ObjectAction> {
        if self.deleted {
            return BTreeSet::new();
        }
        self.metadata.possible_actions()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Replaces the payload of a draft and records a new minor version.
    ///
    /// An equal payload performs no transition.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is a live draft,
    /// [`LibraryError::Validation`] for an invalid payload, and
    /// [`LibraryError::AlreadyExists`] for a duplicate name.
    pub fn edit_draft(
        &mut self,
        payload: P,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<EditOutcome> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        if self.metadata.status() != ItemStatus::Draft {
            return Err(VersioningError::NotDraft.into());
        }
        if payload == self.payload {
            debug!(uid = %self.uid, "edit skipped, payload unchanged");
            return Ok(EditOutcome::Unchanged);
        }
        self.check_replacement(&payload, ports)?;
        let next =
            self.metadata.new_draft_for_edit(author_id, change_description, ports.clock.now())?;
        let from = self.metadata.version();
        let to = next.version();
        self.payload = payload;
        self.advance(next);
        Ok(EditOutcome::Edited {
            from,
            to,
        })
    }

    /// Approves the current draft.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is a live draft.
    pub fn approve(
        &mut self,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        let next = self.metadata.approve(author_id, change_description, ports.clock.now())?;
        self.advance(next);
        Ok(())
    }

    /// Opens a new draft `(x+1).0` from a final version.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is FINAL.
    pub fn create_new_version(
        &mut self,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        self.ensure_final()?;
        let next =
            self.metadata.new_draft_for_edit(author_id, change_description, ports.clock.now())?;
        self.advance(next);
        Ok(())
    }

    /// Opens a new draft from a final version with a replacement payload.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is FINAL or when
    /// frozen parameters change, [`LibraryError::Validation`] for an invalid
    /// payload, and [`LibraryError::AlreadyExists`] for a duplicate name.
    pub fn create_new_version_with_payload(
        &mut self,
        payload: P,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        self.ensure_final()?;
        self.check_replacement(&payload, ports)?;
        let next =
            self.metadata.new_draft_for_edit(author_id, change_description, ports.clock.now())?;
        self.payload = payload;
        self.advance(next);
        Ok(())
    }

    /// Retires a final version.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is FINAL and
    /// [`LibraryError::BusinessLogic`] when the kind guards retirement and
    /// the item is in use.
    pub fn inactivate(
        &mut self,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        let next = self.metadata.retire(author_id, change_description, ports.clock.now())?;
        if self.policy.guard_in_use_on_retire && ports.usage.is_in_use(&self.uid)? {
            return Err(LibraryError::BusinessLogic(format!(
                "{} {} is in use and cannot be retired",
                self.kind, self.uid
            )));
        }
        self.advance(next);
        Ok(())
    }

    /// Reactivates a retired version.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] unless the item is RETIRED.
    pub fn reactivate(
        &mut self,
        author_id: AuthorId,
        change_description: Option<&str>,
        ports: &Collaborators<'_>,
    ) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        let next = self.metadata.reactivate(author_id, change_description, ports.clock.now())?;
        self.advance(next);
        Ok(())
    }

    /// Marks a never-approved item as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Versioning`] once the item was approved and
    /// [`LibraryError::BusinessLogic`] when the kind guards deletion and the
    /// item is in use.
    pub fn soft_delete(&mut self, ports: &Collaborators<'_>) -> LibraryResult<()> {
        self.ensure_usable()?;
        self.ensure_library_gate()?;
        self.metadata.check_deletable()?;
        if self.policy.guard_in_use_on_delete && ports.usage.is_in_use(&self.uid)? {
            return Err(LibraryError::BusinessLogic(format!(
                "{} {} is in use and cannot be deleted",
                self.kind, self.uid
            )));
        }
        self.deleted = true;
        debug!(uid = %self.uid, kind = %self.kind, "library item deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    /// Fails once the item has been deleted.
    fn ensure_usable(&self) -> LibraryResult<()> {
        if self.deleted {
            return Err(LibraryError::BusinessLogic(DELETED_MESSAGE.into()));
        }
        Ok(())
    }

    /// Fails for a locked library unless the kind is exempt.
    fn ensure_library_gate(&self) -> LibraryResult<()> {
        if self.policy.editable_in_locked_library {
            return Ok(());
        }
        self.library.ensure_editable()
    }

    /// Fails unless the current version is FINAL.
    fn ensure_final(&self) -> LibraryResult<()> {
        if self.metadata.status() != ItemStatus::Final {
            return Err(VersioningError::NotFinal.into());
        }
        Ok(())
    }

    /// Validates a replacement payload against the item's rules.
    fn check_replacement(&self, payload: &P, ports: &Collaborators<'_>) -> LibraryResult<()> {
        payload.validate(ports.rules)?;
        if self.policy.freeze_parameters_after_approval
            && self.metadata.version().is_accepted()
            && payload.placeholder_names(ports.rules)?
                != self.payload.placeholder_names(ports.rules)?
        {
            return Err(VersioningError::ParametersFrozen.into());
        }
        if self.policy.unique_name
            && ports.uniqueness.exists_by_name(
                self.library.name(),
                payload.name(),
                Some(&self.uid),
            )?
        {
            return Err(duplicate_name(self.kind, &self.library, payload.name()));
        }
        Ok(())
    }

    /// Closes the current record and makes `next` current.
    fn advance(&mut self, next: ItemMetadata) {
        debug!(
            uid = %self.uid,
            from = %self.metadata.version(),
            to = %next.version(),
            status = %next.status(),
            "library item transitioned"
        );
        let closed = self.metadata.close(next.start_date());
        self.history.push(closed);
        self.metadata = next;
    }
}

/// Builds the uniqueness violation error.
fn duplicate_name(kind: EntityKind, library: &Library, name: &str) -> LibraryError {
    LibraryError::AlreadyExists(format!(
        "{kind} with name '{name}' already exists in library {}",
        library.name()
    ))
}
