// crates/mdr-core/src/core/semver.rs
// ============================================================================
// Module: Item Versions
// Description: Two-part major.minor version numbers for library items.
// Purpose: Compare and increment item versions with a strict persisted form.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Library items carry a `major.minor` version. Drafts bump the minor part;
//! approvals and new versions bump the major part and reset the minor part.
//! Ordering is numeric per component, so `1.10 > 1.9`.
//!
//! Versions persist as the string `"x.y"` and parse strictly: exactly two
//! unsigned integers separated by one dot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Version Type
// ============================================================================

/// Major/minor version of a library item.
///
/// # Invariants
/// - Ordering is lexicographic over `(major, minor)`.
/// - `minor` is reset to 0 whenever `major` increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemVer {
    /// Major component; 0 until the item is first approved.
    major: u32,
    /// Minor component; counts draft edits within a major version.
    minor: u32,
}

impl SemVer {
    /// Version assigned to newly created items.
    pub const INITIAL: Self = Self {
        major: 0,
        minor: 1,
    };

    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
        }
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }

    /// Returns the next minor version (`x.y` to `x.(y+1)`).
    #[must_use]
    pub const fn increment_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor.saturating_add(1),
        }
    }

    /// Returns the next major version (`x.y` to `(x+1).0`).
    #[must_use]
    pub const fn increment_major(self) -> Self {
        Self {
            major: self.major.saturating_add(1),
            minor: 0,
        }
    }

    /// Returns true once the item has been approved at least once.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        self.major > 0
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Error returned when a persisted version string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version `{value}`: expected <major>.<minor>")]
pub struct SemVerParseError {
    /// The rejected input.
    pub value: String,
}

/// Parses one unsigned decimal component without sign or whitespace.
fn parse_component(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl FromStr for SemVer {
    type Err = SemVerParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SemVerParseError {
            value: value.to_string(),
        };
        let (major, minor) = value.split_once('.').ok_or_else(invalid)?;
        let major = parse_component(major).ok_or_else(invalid)?;
        let minor = parse_component(minor).ok_or_else(invalid)?;
        Ok(Self::new(major, minor))
    }
}

impl TryFrom<String> for SemVer {
    type Error = SemVerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemVer> for String {
    fn from(value: SemVer) -> Self {
        value.to_string()
    }
}
