// crates/mdr-core/src/core/template.rs
// ============================================================================
// Module: Template Values
// Description: Syntax templates and their parameterized instances.
// Purpose: Validate template text and render instance names from entries.
// Dependencies: crate::core::{error, identifiers, parameter}, crate::interfaces,
// placeholder-logic, serde
// ============================================================================

//! ## Overview
//! A [`TemplateValue`] is the payload of a template item such as an objective
//! template: free text with bracketed placeholders, each naming a known
//! parameter. A [`ParametrizedTemplateValue`] binds one entry per
//! placeholder, in order, and renders the instance name.
//!
//! Instance names keep the brackets around each bound value so the values
//! stay visible (`"Measure [Weight] at [Visit 1]"`); the plain name drops
//! brackets and markup (`"Measure Weight at Visit 1"`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use placeholder_logic::MAX_TEMPLATE_BYTES;
use placeholder_logic::Placeholder;
use placeholder_logic::plain_text;
use placeholder_logic::scan_with_limit;
use serde::Deserialize;
use serde::Serialize;

use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;
use crate::core::identifiers::ItemUid;
use crate::core::parameter::ConjunctionSet;
use crate::core::parameter::ParameterEntry;
use crate::interfaces::ParameterCatalog;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Default template size limit in bytes.
pub const DEFAULT_MAX_TEMPLATE_BYTES: usize = 64 * 1024;

/// Authoring rules applied to templates and entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRules {
    /// Conjunctions entries may use.
    pub conjunctions: ConjunctionSet,
    /// Maximum template size in bytes; clamped to the parser limit.
    pub max_template_bytes: usize,
}

impl TemplateRules {
    /// Scans a template under the configured size limit.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] for invalid syntax or oversized text.
    pub fn scan(&self, text: &str) -> LibraryResult<Vec<Placeholder>> {
        Ok(scan_with_limit(text, self.max_template_bytes.min(MAX_TEMPLATE_BYTES))?)
    }

    /// Returns the ordered placeholder names of a template.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] for invalid syntax or oversized text.
    pub fn placeholder_names(&self, text: &str) -> LibraryResult<Vec<String>> {
        Ok(self.scan(text)?.into_iter().map(|placeholder| placeholder.name).collect())
    }
}

impl Default for TemplateRules {
    fn default() -> Self {
        Self {
            conjunctions: ConjunctionSet::default(),
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Template Definition
// ============================================================================

/// Payload of a template item.
///
/// # Invariants
/// - `name` has valid placeholder syntax once validated.
/// - `name_plain` is derived from `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateValue {
    /// Template text with placeholders.
    pub name: String,
    /// Template text without markup or brackets.
    pub name_plain: String,
    /// Authoring guidance.
    #[serde(default)]
    pub guidance_text: Option<String>,
    /// Whether instances may override the rendered name.
    #[serde(default)]
    pub editable_instance: bool,
    /// Default entries offered when instantiating.
    #[serde(default)]
    pub default_parameter_values: Vec<ParameterEntry>,
}

impl TemplateValue {
    /// Builds a template value, checking syntax and parameter names.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] for invalid syntax or an unknown
    /// parameter, and [`LibraryError::Port`] when the catalog fails.
    pub fn new<C>(
        name: impl Into<String>,
        guidance_text: Option<String>,
        editable_instance: bool,
        catalog: &C,
        rules: &TemplateRules,
    ) -> LibraryResult<Self>
    where
        C: ParameterCatalog + ?Sized,
    {
        let name = name.into();
        for parameter in rules.placeholder_names(&name)? {
            if !catalog.parameter_exists(&parameter)? {
                return Err(LibraryError::Validation(format!(
                    "template parameter [{parameter}] does not exist"
                )));
            }
        }
        Ok(Self {
            name_plain: plain_text(&name),
            name,
            guidance_text,
            editable_instance,
            default_parameter_values: Vec::new(),
        })
    }

    /// Sets the default entries.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Vec<ParameterEntry>) -> Self {
        self.default_parameter_values = defaults;
        self
    }
}

// ============================================================================
// SECTION: Template Instance
// ============================================================================

/// Payload of a template instance item.
///
/// # Invariants
/// - `parameters` is position-aligned with the placeholders of `template_name`.
/// - `name` and `name_plain` are rendered from `template_name` and `parameters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParametrizedTemplateValue {
    /// Template the instance was created from.
    pub template_uid: ItemUid,
    /// Template text, or the permitted override of it.
    pub template_name: String,
    /// One entry per placeholder, in order.
    pub parameters: Vec<ParameterEntry>,
    /// Rendered name with bracketed values.
    pub name: String,
    /// Rendered name without brackets or markup.
    pub name_plain: String,
}

impl ParametrizedTemplateValue {
    /// Binds entries to a template and renders the instance name.
    ///
    /// Entries that render empty are substituted without brackets.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the entries are not aligned
    /// with the placeholders or a term cannot be rendered.
    pub fn new(
        template_uid: ItemUid,
        template_name: impl Into<String>,
        parameters: Vec<ParameterEntry>,
        rules: &TemplateRules,
    ) -> LibraryResult<Self> {
        let template_name = template_name.into();
        let name = render_name(&template_name, &parameters, rules)?;
        Ok(Self {
            template_uid,
            name_plain: plain_text(&name),
            template_name,
            parameters,
            name,
        })
    }

    /// Checks that the entries align with the template and that the stored
    /// names are their rendering.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] for misaligned entries or a stored
    /// name that differs from the rendered one.
    pub fn verify(&self, rules: &TemplateRules) -> LibraryResult<()> {
        let rendered = render_name(&self.template_name, &self.parameters, rules)?;
        if rendered != self.name || plain_text(&rendered) != self.name_plain {
            return Err(LibraryError::Validation(format!(
                "instance name '{}' does not match its rendering '{rendered}'",
                self.name
            )));
        }
        Ok(())
    }
}

/// Renders an instance name from template text and position-aligned entries.
///
/// Entries that render empty are substituted without brackets.
fn render_name(
    template_name: &str,
    parameters: &[ParameterEntry],
    rules: &TemplateRules,
) -> LibraryResult<String> {
    let placeholders = rules.scan(template_name)?;
    if placeholders.len() != parameters.len() {
        return Err(LibraryError::Validation(format!(
            "template has {} placeholders but {} parameter entries were supplied",
            placeholders.len(),
            parameters.len()
        )));
    }
    let mut name = String::with_capacity(template_name.len());
    let mut cursor = 0;
    for (placeholder, entry) in placeholders.iter().zip(parameters) {
        if placeholder.name != entry.parameter_name {
            return Err(LibraryError::Validation(format!(
                "entry [{}] does not match placeholder [{}]",
                entry.parameter_name, placeholder.name
            )));
        }
        name.push_str(template_name.get(cursor .. placeholder.start).unwrap_or_default());
        let rendered = entry.render()?;
        if !rendered.is_empty() {
            name.push('[');
            name.push_str(&rendered);
            name.push(']');
        }
        cursor = placeholder.end;
    }
    name.push_str(template_name.get(cursor ..).unwrap_or_default());
    Ok(name)
}
