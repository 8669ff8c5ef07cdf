// crates/mdr-core/src/core/mod.rs
// ============================================================================
// Module: MDR Core Types
// Description: Value objects, metadata, policies, and errors of library items.
// Purpose: Group the pure, port-free building blocks of the kernel.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Core types are pure data plus the transition rules that act on them. They
//! never read the clock or touch storage; runtime code supplies both.

pub mod concept;
pub mod error;
pub mod identifiers;
pub mod library;
pub mod metadata;
pub mod parameter;
pub mod payload;
pub mod policy;
pub mod semver;
pub mod template;

pub use concept::ConceptValue;
pub use error::LibraryError;
pub use error::LibraryResult;
pub use error::PortError;
pub use error::VersioningError;
pub use identifiers::AuthorId;
pub use identifiers::ItemUid;
pub use identifiers::LibraryName;
pub use identifiers::TermUid;
pub use library::Library;
pub use metadata::ItemMetadata;
pub use metadata::ItemStatus;
pub use metadata::ObjectAction;
pub use metadata::possible_actions;
pub use parameter::ComplexTerm;
pub use parameter::ConjunctionSet;
pub use parameter::DEFAULT_CONJUNCTIONS;
pub use parameter::EntryInput;
pub use parameter::ParameterEntry;
pub use parameter::ParameterTerm;
pub use parameter::TermInput;
pub use parameter::join_values;
pub use payload::ItemPayload;
pub use payload::LibraryPayload;
pub use policy::EntityKind;
pub use policy::ItemPolicy;
pub use policy::PolicyTable;
pub use semver::SemVer;
pub use semver::SemVerParseError;
pub use template::DEFAULT_MAX_TEMPLATE_BYTES;
pub use template::ParametrizedTemplateValue;
pub use template::TemplateRules;
pub use template::TemplateValue;
