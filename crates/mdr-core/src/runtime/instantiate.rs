// crates/mdr-core/src/runtime/instantiate.rs
// ============================================================================
// Module: Template Instantiation
// Description: Builds template instances from a template snapshot and entries.
// Purpose: Resolve the applicable template and bind validated entries to it.
// Dependencies: crate::{core, interfaces}, serde, time, tracing
// ============================================================================

//! ## Overview
//! Instantiation resolves the template's current FINAL value, or the value
//! that was current at a past date, then resolves each caller entry through
//! the term lookup and renders the instance name.
//!
//! A caller may override the instance name only when the template allows it
//! and only when the override keeps the template's placeholders in the same
//! order. This prevents an instance from silently dropping or reordering
//! required parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::core::EntryInput;
use crate::core::ItemUid;
use crate::core::LibraryError;
use crate::core::LibraryResult;
use crate::core::ParameterEntry;
use crate::core::ParametrizedTemplateValue;
use crate::core::TemplateRules;
use crate::interfaces::ParameterTermLookup;
use crate::interfaces::TemplateValueSource;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Caller request to instantiate a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// Template to instantiate.
    pub template_uid: ItemUid,
    /// Point in time whose template value applies; `None` for the current one.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub as_of: Option<OffsetDateTime>,
    /// Replacement template text for the instance name.
    #[serde(default)]
    pub name_override: Option<String>,
    /// Entries in placeholder order; empty to use the template defaults.
    #[serde(default)]
    pub parameters: Vec<EntryInput>,
}

// ============================================================================
// SECTION: Instantiator
// ============================================================================

/// Binds entries to template snapshots.
pub struct TemplateInstantiator<'a> {
    /// Template snapshot source.
    templates: &'a dyn TemplateValueSource,
    /// Term legality lookup.
    terms: &'a dyn ParameterTermLookup,
    /// Authoring rules.
    rules: &'a TemplateRules,
}

impl<'a> TemplateInstantiator<'a> {
    /// Creates an instantiator over the given ports.
    #[must_use]
    pub const fn new(
        templates: &'a dyn TemplateValueSource,
        terms: &'a dyn ParameterTermLookup,
        rules: &'a TemplateRules,
    ) -> Self {
        Self {
            templates,
            terms,
            rules,
        }
    }

    /// Instantiates a template.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] when no applicable template value
    /// exists, [`LibraryError::Validation`] for a forbidden or inconsistent
    /// name override and for invalid entries, and [`LibraryError::Port`] when
    /// a collaborator fails.
    pub fn instantiate(
        &self,
        request: &InstanceRequest,
    ) -> LibraryResult<ParametrizedTemplateValue> {
        let uid = &request.template_uid;
        let template = match request.as_of {
            Some(as_of) => self.templates.find_value_at(uid, as_of)?,
            None => self.templates.find_final_value(uid)?,
        }
        .ok_or_else(|| LibraryError::NotFound(format!("template {uid} has no final version")))?;

        let template_text = match &request.name_override {
            Some(name_override) => {
                if !template.editable_instance {
                    return Err(LibraryError::Validation(format!(
                        "instances of template {uid} may not override their name"
                    )));
                }
                if self.rules.placeholder_names(name_override)?
                    != self.rules.placeholder_names(&template.name)?
                {
                    return Err(LibraryError::Validation(
                        "name override must keep the template parameters in the same order".into(),
                    ));
                }
                name_override.clone()
            }
            None => template.name.clone(),
        };

        let declared = self.rules.placeholder_names(&template_text)?;
        let entries = if request.parameters.is_empty() && !declared.is_empty() {
            template.default_parameter_values.clone()
        } else {
            request
                .parameters
                .iter()
                .map(|input| {
                    let conjunctions = &self.rules.conjunctions;
                    ParameterEntry::from_input(input, &declared, self.terms, conjunctions)
                })
                .collect::<LibraryResult<Vec<_>>>()?
        };
        let instance =
            ParametrizedTemplateValue::new(uid.clone(), template_text, entries, self.rules)?;
        debug!(template_uid = %uid, name = %instance.name_plain, "template instantiated");
        Ok(instance)
    }
}
