// crates/mdr-core/src/core/error.rs
// ============================================================================
// Module: MDR Errors
// Description: Error taxonomy for library item operations.
// Purpose: Separate validation, conflict, rule, lifecycle, and lookup failures.
// Dependencies: placeholder-logic, thiserror
// ============================================================================

//! ## Overview
//! Every operation in this crate fails with a [`LibraryError`]. Callers map the
//! variants to user-facing responses:
//!
//! - `Validation`: malformed input the caller could have prevented.
//! - `AlreadyExists`: a uniqueness rule was violated.
//! - `BusinessLogic`: a state-dependent rule was violated.
//! - `Versioning`: an illegal lifecycle transition was attempted.
//! - `NotFound`: a referenced item, template, or term does not exist.
//! - `Port`: a collaborator failed; surfaced unchanged.
//!
//! Nothing is retried. A failed operation leaves the aggregate unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use placeholder_logic::PlaceholderError;
use thiserror::Error;

// ============================================================================
// SECTION: Versioning Errors
// ============================================================================

/// Illegal lifecycle transitions.
///
/// # Invariants
/// - Messages and [`VersioningError::code`] values are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersioningError {
    /// Operation requires a draft.
    #[error("object isn't in draft status")]
    NotDraft,
    /// Operation requires a final version.
    #[error("object isn't in final status")]
    NotFinal,
    /// Drafts cannot be retired.
    #[error("cannot retire draft version")]
    RetireDraft,
    /// Retired versions cannot be retired again.
    #[error("object is already retired")]
    AlreadyRetired,
    /// Reactivation requires a retired version.
    #[error("only RETIRED version can be reactivated")]
    NotRetired,
    /// Retired versions cannot be edited.
    #[error("cannot create a draft from a retired version")]
    DraftFromRetired,
    /// Items that were ever approved cannot be deleted.
    #[error("object has been accepted")]
    Accepted,
    /// Template placeholders are frozen after the first approval.
    #[error("cannot change number or order of template parameters")]
    ParametersFrozen,
    /// The item changed after it was loaded.
    #[error("item was modified after it was loaded")]
    StaleVersion,
}

impl VersioningError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotDraft => "invalid_status_non_draft",
            Self::NotFinal => "invalid_status_non_final",
            Self::RetireDraft => "invalid_status_draft",
            Self::AlreadyRetired => "already_retired",
            Self::NotRetired => "invalid_status_non_retired",
            Self::DraftFromRetired => "invalid_status_retired",
            Self::Accepted => "object_accepted",
            Self::ParametersFrozen => "parameters_frozen",
            Self::StaleVersion => "stale_version",
        }
    }
}

// ============================================================================
// SECTION: Port Errors
// ============================================================================

/// Failures reported by external collaborators.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// Collaborator could not be reached or its state is unusable.
    #[error("port unavailable: {0}")]
    Unavailable(String),
    /// Collaborator returned data that fails integrity checks.
    #[error("port returned invalid data: {0}")]
    Invalid(String),
    /// A write was based on state that is no longer current.
    #[error("write conflict: {0}")]
    Conflict(String),
}

// ============================================================================
// SECTION: Library Errors
// ============================================================================

/// Errors raised by library item operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// Malformed input.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Uniqueness violation.
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// State-dependent rule violation.
    #[error("business rule violated: {0}")]
    BusinessLogic(String),
    /// Illegal lifecycle transition.
    #[error(transparent)]
    Versioning(#[from] VersioningError),
    /// Missing referenced object.
    #[error("not found: {0}")]
    NotFound(String),
    /// Collaborator failure.
    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<PlaceholderError> for LibraryError {
    fn from(error: PlaceholderError) -> Self {
        Self::Validation(error.to_string())
    }
}

/// Result alias for library item operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
