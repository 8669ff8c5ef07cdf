// crates/mdr-core/src/core/library.rs
// ============================================================================
// Module: Library Membership
// Description: Library reference carried by every versioned item.
// Purpose: Gate create and edit operations on library editability.
// Dependencies: crate::core::{error, identifiers}, serde
// ============================================================================

//! ## Overview
//! Items belong to exactly one library, referenced by name. A library that is
//! not editable rejects creation and, unless the entity kind opts out, every
//! later transition.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;
use crate::core::identifiers::LibraryName;

// ============================================================================
// SECTION: Library
// ============================================================================

/// Library reference with its editability flag.
///
/// # Invariants
/// - The flag is a snapshot taken when the item was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Library name.
    name: LibraryName,
    /// Whether items in the library may be created or edited.
    is_editable: bool,
}

impl Library {
    /// Creates a library reference.
    #[must_use]
    pub fn new(name: impl Into<LibraryName>, is_editable: bool) -> Self {
        Self {
            name: name.into(),
            is_editable,
        }
    }

    /// Resolves a library through an editability lookup.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::BusinessLogic`] when the lookup does not know
    /// the library.
    pub fn from_lookup<F>(name: impl Into<LibraryName>, lookup: F) -> LibraryResult<Self>
    where
        F: FnOnce(&LibraryName) -> Option<bool>,
    {
        let name = name.into();
        match lookup(&name) {
            Some(is_editable) => Ok(Self {
                name,
                is_editable,
            }),
            None => Err(LibraryError::BusinessLogic(format!("library {name} does not exist"))),
        }
    }

    /// Returns the library name.
    #[must_use]
    pub const fn name(&self) -> &LibraryName {
        &self.name
    }

    /// Returns true when items may be created or edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.is_editable
    }

    /// Fails unless the library is editable.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::BusinessLogic`] for a locked library.
    pub fn ensure_editable(&self) -> LibraryResult<()> {
        if self.is_editable {
            Ok(())
        } else {
            Err(LibraryError::BusinessLogic(format!("library {} is not editable", self.name)))
        }
    }
}
