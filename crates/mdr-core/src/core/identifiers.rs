// crates/mdr-core/src/core/identifiers.rs
// ============================================================================
// Module: MDR Identifiers
// Description: Opaque identifiers for library items, libraries, authors, and terms.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque UTF-8 strings that serialize transparently. Item
//! uids are allocated once by the `UidGenerator` port and never change; the
//! other identifiers are supplied by callers and are not normalized.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Permanent identifier of a versioned library item.
///
/// # Invariants
/// - Assigned once at creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemUid(String);

impl ItemUid {
    /// Creates a new item identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the item identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ItemUid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemUid {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Name of the library an item belongs to.
///
/// # Invariants
/// - Opaque UTF-8 string; libraries are referenced by name, never owned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryName(String);

impl LibraryName {
    /// Creates a new library name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the library name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for LibraryName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LibraryName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifier of the user performing a lifecycle transition.
///
/// # Invariants
/// - Opaque UTF-8 string; recorded verbatim in item metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    /// Creates a new author identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the author identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AuthorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AuthorId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifier of a parameter term bound to a template placeholder.
///
/// # Invariants
/// - Opaque UTF-8 string; legality is decided by the term lookup port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermUid(String);

impl TermUid {
    /// Creates a new term identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the term identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TermUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TermUid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TermUid {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
