// crates/mdr-core/src/core/metadata.rs
// ============================================================================
// Module: Item Metadata
// Description: Per-version status, version number, author, and validity dates.
// Purpose: Encode the legal lifecycle transitions of a versioned library item.
// Dependencies: crate::core::{error, identifiers, semver}, serde, time
// ============================================================================

//! ## Overview
//! An [`ItemMetadata`] record describes one version of a library item. Each
//! transition produces a new record and closes the previous one by stamping
//! its `end_date`. Transitions are pure: they return the next record or a
//! [`VersioningError`] and never mutate `self`.
//!
//! | From    | Transition         | To                    |
//! |---------|--------------------|-----------------------|
//! | DRAFT   | approve            | FINAL `(x+1).0`       |
//! | DRAFT   | new draft          | DRAFT `x.(y+1)`       |
//! | FINAL   | new draft          | DRAFT `(x+1).0`       |
//! | FINAL   | retire             | RETIRED `x.y`         |
//! | RETIRED | reactivate         | FINAL `x.y`           |

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;
use crate::core::error::VersioningError;
use crate::core::identifiers::AuthorId;
use crate::core::semver::SemVer;

// ============================================================================
// SECTION: Change Descriptions
// ============================================================================

/// Change description recorded on creation.
pub const INITIAL_VERSION_DESCRIPTION: &str = "Initial version";
/// Default change description for approvals.
pub const APPROVED_VERSION_DESCRIPTION: &str = "Approved version";
/// Default change description for new drafts.
pub const NEW_DRAFT_DESCRIPTION: &str = "New draft created";
/// Default change description for retirements.
pub const INACTIVATED_VERSION_DESCRIPTION: &str = "Inactivated version";
/// Default change description for reactivations.
pub const REACTIVATED_VERSION_DESCRIPTION: &str = "Reactivated version";

// ============================================================================
// SECTION: Status And Actions
// ============================================================================

/// Lifecycle status of an item version.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Editable working version.
    Draft,
    /// Approved, read-only version.
    Final,
    /// Withdrawn version.
    Retired,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Draft => "Draft",
            Self::Final => "Final",
            Self::Retired => "Retired",
        };
        f.write_str(label)
    }
}

/// Operations a caller may invoke on an item.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectAction {
    /// Approve the current draft.
    Approve,
    /// Edit the current draft.
    Edit,
    /// Delete a never-approved item.
    Delete,
    /// Open a new draft from a final version.
    NewVersion,
    /// Retire a final version.
    Inactivate,
    /// Reactivate a retired version.
    Reactivate,
}

impl fmt::Display for ObjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Approve => "approve",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::NewVersion => "new_version",
            Self::Inactivate => "inactivate",
            Self::Reactivate => "reactivate",
        };
        f.write_str(label)
    }
}

/// Returns the actions available for a status and major version.
///
/// This is a pure function of its inputs.
#[must_use]
pub fn possible_actions(status: ItemStatus, major: u32) -> BTreeSet<ObjectAction> {
    match (status, major) {
        (ItemStatus::Draft, 0) => {
            BTreeSet::from([ObjectAction::Approve, ObjectAction::Edit, ObjectAction::Delete])
        }
        (ItemStatus::Draft, _) => BTreeSet::from([ObjectAction::Approve, ObjectAction::Edit]),
        (ItemStatus::Final, _) => {
            BTreeSet::from([ObjectAction::NewVersion, ObjectAction::Inactivate])
        }
        (ItemStatus::Retired, _) => BTreeSet::from([ObjectAction::Reactivate]),
    }
}

// ============================================================================
// SECTION: Metadata Record
// ============================================================================

/// Metadata of one item version.
///
/// # Invariants
/// - `version` is never `0.0`.
/// - `end_date` is `None` iff the record is the current version.
/// - When present, `end_date >= start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Lifecycle status.
    status: ItemStatus,
    /// Version number.
    version: SemVer,
    /// Author of the transition that produced this record.
    author_id: AuthorId,
    /// Free-text change description.
    change_description: String,
    /// Time the record became current.
    #[serde(with = "time::serde::rfc3339")]
    start_date: OffsetDateTime,
    /// Time the record was superseded.
    #[serde(default, with = "time::serde::rfc3339::option")]
    end_date: Option<OffsetDateTime>,
}

impl ItemMetadata {
    /// Creates the metadata of a newly created item (DRAFT 0.1).
    #[must_use]
    pub fn initial(author_id: AuthorId, now: OffsetDateTime) -> Self {
        Self {
            status: ItemStatus::Draft,
            version: SemVer::INITIAL,
            author_id,
            change_description: INITIAL_VERSION_DESCRIPTION.to_string(),
            start_date: now,
            end_date: None,
        }
    }

    /// Rebuilds metadata loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the version is `0.0` or the
    /// end date precedes the start date.
    pub fn from_repository_values(
        status: ItemStatus,
        version: SemVer,
        author_id: AuthorId,
        change_description: impl Into<String>,
        start_date: OffsetDateTime,
        end_date: Option<OffsetDateTime>,
    ) -> LibraryResult<Self> {
        if version.major() == 0 && version.minor() == 0 {
            return Err(LibraryError::Validation("version 0.0 is not a valid item version".into()));
        }
        if let Some(end) = end_date
            && end < start_date
        {
            return Err(LibraryError::Validation(format!(
                "end date {end} precedes start date {start_date}"
            )));
        }
        Ok(Self {
            status,
            version,
            author_id,
            change_description: change_description.into(),
            start_date,
            end_date,
        })
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        self.status
    }

    /// Returns the version number.
    #[must_use]
    pub const fn version(&self) -> SemVer {
        self.version
    }

    /// Returns the author of this record.
    #[must_use]
    pub const fn author_id(&self) -> &AuthorId {
        &self.author_id
    }

    /// Returns the change description.
    #[must_use]
    pub fn change_description(&self) -> &str {
        &self.change_description
    }

    /// Returns the time the record became current.
    #[must_use]
    pub const fn start_date(&self) -> OffsetDateTime {
        self.start_date
    }

    /// Returns the time the record was superseded, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<OffsetDateTime> {
        self.end_date
    }

    /// Returns true while this record is the current version.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    /// Returns the actions available from this record.
    #[must_use]
    pub fn possible_actions(&self) -> BTreeSet<ObjectAction> {
        possible_actions(self.status, self.version.major())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Approves a draft, producing FINAL `(x+1).0`.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::NotDraft`] unless the status is DRAFT.
    pub fn approve(
        &self,
        author_id: AuthorId,
        change_description: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Self, VersioningError> {
        if self.status != ItemStatus::Draft {
            return Err(VersioningError::NotDraft);
        }
        Ok(self.successor(
            ItemStatus::Final,
            self.version.increment_major(),
            author_id,
            change_description.unwrap_or(APPROVED_VERSION_DESCRIPTION),
            now,
        ))
    }

    /// Opens a new draft.
    ///
    /// From DRAFT the minor part increments; from FINAL the major part
    /// increments and the minor part resets.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::DraftFromRetired`] when the status is RETIRED.
    pub fn new_draft_for_edit(
        &self,
        author_id: AuthorId,
        change_description: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Self, VersioningError> {
        let version = match self.status {
            ItemStatus::Draft => self.version.increment_minor(),
            ItemStatus::Final => self.version.increment_major(),
            ItemStatus::Retired => return Err(VersioningError::DraftFromRetired),
        };
        Ok(self.successor(
            ItemStatus::Draft,
            version,
            author_id,
            change_description.unwrap_or(NEW_DRAFT_DESCRIPTION),
            now,
        ))
    }

    /// Retires a final version; the version number is kept.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::RetireDraft`] from DRAFT and
    /// [`VersioningError::AlreadyRetired`] from RETIRED.
    pub fn retire(
        &self,
        author_id: AuthorId,
        change_description: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Self, VersioningError> {
        match self.status {
            ItemStatus::Draft => Err(VersioningError::RetireDraft),
            ItemStatus::Retired => Err(VersioningError::AlreadyRetired),
            ItemStatus::Final => Ok(self.successor(
                ItemStatus::Retired,
                self.version,
                author_id,
                change_description.unwrap_or(INACTIVATED_VERSION_DESCRIPTION),
                now,
            )),
        }
    }

    /// Reactivates a retired version; the version number is kept.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::NotRetired`] unless the status is RETIRED.
    pub fn reactivate(
        &self,
        author_id: AuthorId,
        change_description: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Self, VersioningError> {
        if self.status != ItemStatus::Retired {
            return Err(VersioningError::NotRetired);
        }
        Ok(self.successor(
            ItemStatus::Final,
            self.version,
            author_id,
            change_description.unwrap_or(REACTIVATED_VERSION_DESCRIPTION),
            now,
        ))
    }

    /// Checks that the item was never approved and may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::Accepted`] once `major > 0`.
    pub const fn check_deletable(&self) -> Result<(), VersioningError> {
        if self.version.is_accepted() {
            return Err(VersioningError::Accepted);
        }
        Ok(())
    }

    /// Returns a copy of this record closed at `now`.
    #[must_use]
    pub fn close(&self, now: OffsetDateTime) -> Self {
        Self {
            end_date: Some(now),
            ..self.clone()
        }
    }

    /// Builds the record that follows this one.
    fn successor(
        &self,
        status: ItemStatus,
        version: SemVer,
        author_id: AuthorId,
        change_description: &str,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            status,
            version,
            author_id,
            change_description: change_description.to_string(),
            start_date: now.max(self.start_date),
            end_date: None,
        }
    }
}
