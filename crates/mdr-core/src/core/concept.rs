// crates/mdr-core/src/core/concept.rs
// ============================================================================
// Module: Concept Values
// Description: Named, definable, abbreviatable payload shared by concepts.
// Purpose: Validate the common naming rules of concept-like library items.
// Dependencies: crate::core::error, serde
// ============================================================================

//! ## Overview
//! Activities, unit definitions and other concepts share the same payload
//! shape: a name, an optional sentence-case rendering of it, a definition and
//! an abbreviation.

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;

/// Payload of concept-like library items.
///
/// # Invariants
/// - `name` is non-blank once validated.
/// - `name_sentence_case`, when present, equals `name` ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptValue {
    /// Display name.
    pub name: String,
    /// Sentence-case rendering of the name.
    #[serde(default)]
    pub name_sentence_case: Option<String>,
    /// Free-text definition.
    #[serde(default)]
    pub definition: Option<String>,
    /// Abbreviation.
    #[serde(default)]
    pub abbreviation: Option<String>,
}

impl ConceptValue {
    /// Creates a concept value with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_sentence_case: None,
            definition: None,
            abbreviation: None,
        }
    }

    /// Sets the sentence-case name.
    #[must_use]
    pub fn with_sentence_case(mut self, value: impl Into<String>) -> Self {
        self.name_sentence_case = Some(value.into());
        self
    }

    /// Sets the definition.
    #[must_use]
    pub fn with_definition(mut self, value: impl Into<String>) -> Self {
        self.definition = Some(value.into());
        self
    }

    /// Sets the abbreviation.
    #[must_use]
    pub fn with_abbreviation(mut self, value: impl Into<String>) -> Self {
        self.abbreviation = Some(value.into());
        self
    }

    /// Checks the naming rules.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] for a blank name or a sentence-case
    /// name that differs from `name` by more than letter case.
    pub fn validate(&self) -> LibraryResult<()> {
        if self.name.trim().is_empty() {
            return Err(LibraryError::Validation("name must not be blank".into()));
        }
        if let Some(sentence_case) = &self.name_sentence_case
            && sentence_case.to_lowercase() != self.name.to_lowercase()
        {
            return Err(LibraryError::Validation(format!(
                "sentence case name '{sentence_case}' must match name '{}' ignoring case",
                self.name
            )));
        }
        Ok(())
    }
}
