// crates/mdr-core/src/core/payload.rs
// ============================================================================
// Module: Item Payloads
// Description: Capability trait for values carried by versioned items.
// Purpose: Let one generic aggregate host concepts, templates, and instances.
// Dependencies: crate::core::{concept, error, template}, serde
// ============================================================================

//! ## Overview
//! The aggregate only needs three things from its payload: a name for
//! uniqueness checks, a self-validation hook, and the ordered placeholder
//! names for the frozen-parameter rule. Equality decides whether an edit
//! changes anything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::concept::ConceptValue;
use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;
use crate::core::template::ParametrizedTemplateValue;
use crate::core::template::TemplateRules;
use crate::core::template::TemplateValue;

// ============================================================================
// SECTION: Capability Trait
// ============================================================================

/// Value carried by a versioned item.
pub trait LibraryPayload: Clone + PartialEq {
    /// Returns the name used for uniqueness checks.
    fn name(&self) -> &str;

    /// Checks the payload's own invariants under the authoring rules.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the payload is malformed.
    fn validate(&self, rules: &TemplateRules) -> LibraryResult<()>;

    /// Returns the ordered placeholder names; empty for non-template payloads.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the template text is invalid.
    fn placeholder_names(&self, _rules: &TemplateRules) -> LibraryResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Rejects blank names.
fn require_name(name: &str) -> LibraryResult<()> {
    if name.trim().is_empty() {
        return Err(LibraryError::Validation("name must not be blank".into()));
    }
    Ok(())
}

impl LibraryPayload for ConceptValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, _rules: &TemplateRules) -> LibraryResult<()> {
        Self::validate(self)
    }
}

impl LibraryPayload for TemplateValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, rules: &TemplateRules) -> LibraryResult<()> {
        require_name(&self.name)?;
        rules.scan(&self.name)?;
        Ok(())
    }

    fn placeholder_names(&self, rules: &TemplateRules) -> LibraryResult<Vec<String>> {
        rules.placeholder_names(&self.name)
    }
}

impl LibraryPayload for ParametrizedTemplateValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, rules: &TemplateRules) -> LibraryResult<()> {
        require_name(&self.name)?;
        self.verify(rules)
    }

    fn placeholder_names(&self, rules: &TemplateRules) -> LibraryResult<Vec<String>> {
        rules.placeholder_names(&self.template_name)
    }
}

// ============================================================================
// SECTION: Tagged Payload
// ============================================================================

/// Payload of any supported item flavor.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ItemPayload {
    /// Concept payload.
    Concept(ConceptValue),
    /// Template definition payload.
    Template(TemplateValue),
    /// Template instance payload.
    Instance(ParametrizedTemplateValue),
}

impl LibraryPayload for ItemPayload {
    fn name(&self) -> &str {
        match self {
            Self::Concept(value) => value.name(),
            Self::Template(value) => value.name(),
            Self::Instance(value) => value.name(),
        }
    }

    fn validate(&self, rules: &TemplateRules) -> LibraryResult<()> {
        match self {
            Self::Concept(value) => LibraryPayload::validate(value, rules),
            Self::Template(value) => value.validate(rules),
            Self::Instance(value) => value.validate(rules),
        }
    }

    fn placeholder_names(&self, rules: &TemplateRules) -> LibraryResult<Vec<String>> {
        match self {
            Self::Concept(value) => value.placeholder_names(rules),
            Self::Template(value) => value.placeholder_names(rules),
            Self::Instance(value) => value.placeholder_names(rules),
        }
    }
}

impl From<ConceptValue> for ItemPayload {
    fn from(value: ConceptValue) -> Self {
        Self::Concept(value)
    }
}

impl From<TemplateValue> for ItemPayload {
    fn from(value: TemplateValue) -> Self {
        Self::Template(value)
    }
}

impl From<ParametrizedTemplateValue> for ItemPayload {
    fn from(value: ParametrizedTemplateValue) -> Self {
        Self::Instance(value)
    }
}
