// crates/mdr-core/src/interfaces/mod.rs
// ============================================================================
// Module: MDR Interfaces
// Description: Ports for identifiers, lookups, usage guards, time, and storage.
// Purpose: Define the collaborator contracts consumed by the library kernel.
// Dependencies: crate::core, crate::runtime, time
// ============================================================================

//! ## Overview
//! The kernel never reaches out to storage, terminology, or the wall clock on
//! its own. Every external question goes through one of these ports.
//! Implementations must answer consistently with the transaction the
//! operation runs in; the kernel takes no responsibility for isolation.
//!
//! Plain closures implement the single-question ports, which keeps tests and
//! small hosts free of adapter boilerplate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::core::ItemUid;
use crate::core::LibraryName;
use crate::core::LibraryPayload;
use crate::core::ParameterTerm;
use crate::core::PortError;
use crate::core::TemplateRules;
use crate::core::TemplateValue;
use crate::core::TermUid;
use crate::runtime::VersionedItem;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Allocates permanent item identifiers.
pub trait UidGenerator {
    /// Returns a new, globally unique identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when no identifier can be allocated.
    fn generate_uid(&self) -> Result<ItemUid, PortError>;
}

impl<F> UidGenerator for F
where
    F: Fn() -> ItemUid,
{
    fn generate_uid(&self) -> Result<ItemUid, PortError> {
        Ok((self)())
    }
}

// ============================================================================
// SECTION: Existence Checks
// ============================================================================

/// Answers name-uniqueness questions within a library.
pub trait UniquenessChecker {
    /// Returns true when another live item in `library` already uses `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the check cannot be answered.
    fn exists_by_name(
        &self,
        library: &LibraryName,
        name: &str,
        excluding: Option<&ItemUid>,
    ) -> Result<bool, PortError>;
}

impl<F> UniquenessChecker for F
where
    F: Fn(&LibraryName, &str, Option<&ItemUid>) -> bool,
{
    fn exists_by_name(
        &self,
        library: &LibraryName,
        name: &str,
        excluding: Option<&ItemUid>,
    ) -> Result<bool, PortError> {
        Ok((self)(library, name, excluding))
    }
}

/// Resolves the terms legal for a template parameter.
pub trait ParameterTermLookup {
    /// Returns the term when `uid` is a legal value of `parameter_name`.
    ///
    /// When `value` is given it must agree with the stored term value;
    /// otherwise the lookup returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the lookup fails.
    fn find_term(
        &self,
        parameter_name: &str,
        uid: &TermUid,
        value: Option<&str>,
    ) -> Result<Option<ParameterTerm>, PortError>;
}

impl<F> ParameterTermLookup for F
where
    F: Fn(&str, &TermUid, Option<&str>) -> Option<ParameterTerm>,
{
    fn find_term(
        &self,
        parameter_name: &str,
        uid: &TermUid,
        value: Option<&str>,
    ) -> Result<Option<ParameterTerm>, PortError> {
        Ok((self)(parameter_name, uid, value))
    }
}

/// Answers whether a template parameter exists.
pub trait ParameterCatalog {
    /// Returns true when `name` is a known template parameter.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the catalog is unavailable.
    fn parameter_exists(&self, name: &str) -> Result<bool, PortError>;
}

impl<F> ParameterCatalog for F
where
    F: Fn(&str) -> bool,
{
    fn parameter_exists(&self, name: &str) -> Result<bool, PortError> {
        Ok((self)(name))
    }
}

/// Referential-integrity guard consulted before retire and delete.
pub trait UsageGuard {
    /// Returns true while other items reference `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the guard cannot be evaluated.
    fn is_in_use(&self, uid: &ItemUid) -> Result<bool, PortError>;
}

impl<F> UsageGuard for F
where
    F: Fn(&ItemUid) -> bool,
{
    fn is_in_use(&self, uid: &ItemUid) -> Result<bool, PortError> {
        Ok((self)(uid))
    }
}

// ============================================================================
// SECTION: Template Source
// ============================================================================

/// Resolves template snapshots for instantiation.
pub trait TemplateValueSource {
    /// Returns the current FINAL value of a template.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the lookup fails.
    fn find_final_value(&self, uid: &ItemUid) -> Result<Option<TemplateValue>, PortError>;

    /// Returns the FINAL value that was current at `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the lookup fails.
    fn find_value_at(
        &self,
        uid: &ItemUid,
        as_of: OffsetDateTime,
    ) -> Result<Option<TemplateValue>, PortError>;
}

/// Records newly approved template values.
pub trait TemplatePublisher {
    /// Makes `value` the FINAL value of a template from `effective` on.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the write fails.
    fn publish(
        &self,
        uid: &ItemUid,
        value: TemplateValue,
        effective: OffsetDateTime,
    ) -> Result<(), PortError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of transition timestamps.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> OffsetDateTime;
}

impl<F> Clock for F
where
    F: Fn() -> OffsetDateTime,
{
    fn now(&self) -> OffsetDateTime {
        (self)()
    }
}

// ============================================================================
// SECTION: Item Repository
// ============================================================================

/// Persistence port for versioned items.
pub trait ItemRepository<P: LibraryPayload> {
    /// Loads an item; `for_update` asks the store to lock it for the
    /// enclosing transaction.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when loading fails.
    fn find_by_uid(
        &self,
        uid: &ItemUid,
        for_update: bool,
    ) -> Result<Option<VersionedItem<P>>, PortError>;

    /// Persists the item and appends the metadata records it closed.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when saving fails.
    fn save(&self, item: &VersionedItem<P>) -> Result<(), PortError>;
}

// ============================================================================
// SECTION: Collaborators
// ============================================================================

/// Ports and authoring rules consulted by aggregate operations.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Identifier allocation.
    pub uid_generator: &'a dyn UidGenerator,
    /// Name uniqueness checks.
    pub uniqueness: &'a dyn UniquenessChecker,
    /// In-use guard for retire and delete.
    pub usage: &'a dyn UsageGuard,
    /// Transition timestamps.
    pub clock: &'a dyn Clock,
    /// Template syntax and size rules for payload validation.
    pub rules: &'a TemplateRules,
}
