// crates/mdr-cli/src/template.rs
// ============================================================================
// Module: CLI Template Commands
// Description: Syntax checks and ad hoc instantiation of template text.
// Purpose: Back `mdr template check` and `mdr template render`.
// Dependencies: mdr-core, mdr-config, placeholder-logic, serde, time, tracing
// ============================================================================

//! ## Overview
//! Both commands work on template text supplied by the caller rather than on
//! stored library items. Rendering publishes the text as the only FINAL value
//! of a throwaway template, registers every supplied value as a legal term of
//! its entry, and runs the regular instantiation path. The configured
//! conjunctions, size limit, and template cache therefore apply exactly as
//! they would for a stored template.
//!
//! Term uids carry the entry position, so a placeholder that appears twice
//! keeps separate values for each occurrence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mdr_config::MdrConfig;
use mdr_core::CachedTemplateSource;
use mdr_core::EntryInput;
use mdr_core::InMemoryTemplateSource;
use mdr_core::InMemoryTermLookup;
use mdr_core::InstanceRequest;
use mdr_core::ItemUid;
use mdr_core::LibraryResult;
use mdr_core::ParameterTerm;
use mdr_core::ParametrizedTemplateValue;
use mdr_core::SystemClock;
use mdr_core::TemplateInstantiator;
use mdr_core::TemplatePublisher;
use mdr_core::TemplateRules;
use mdr_core::TemplateValue;
use mdr_core::TemplateValueSource;
use mdr_core::TermInput;
use placeholder_logic::Placeholder;
use placeholder_logic::plain_text;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Uid under which rendered template text is published.
pub const RENDER_TEMPLATE_UID: &str = "cli_template";

// ============================================================================
// SECTION: Check
// ============================================================================

/// Result of a successful syntax check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateCheck {
    /// Template text without markup and brackets.
    pub name_plain: String,
    /// Placeholders in order of appearance.
    pub placeholders: Vec<Placeholder>,
}

/// Checks template syntax under the configured size limit.
///
/// # Errors
///
/// Returns [`mdr_core::LibraryError::Validation`] naming the first syntax
/// error and its byte offset.
pub fn check_template(text: &str, rules: &TemplateRules) -> LibraryResult<TemplateCheck> {
    let placeholders = rules.scan(text)?;
    Ok(TemplateCheck {
        name_plain: plain_text(text),
        placeholders,
    })
}

// ============================================================================
// SECTION: Render
// ============================================================================

/// JSON document accepted by `mdr template render`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderInput {
    /// Template text.
    pub template: String,
    /// Replacement text for the instance name.
    #[serde(default)]
    pub name_override: Option<String>,
    /// Whether instances may override their name.
    #[serde(default)]
    pub editable_instance: bool,
    /// Entries in placeholder order.
    #[serde(default)]
    pub entries: Vec<RenderEntry>,
}

/// One placeholder binding in a [`RenderInput`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderEntry {
    /// Placeholder name.
    pub name: String,
    /// Conjunction joining the values.
    #[serde(default)]
    pub conjunction: String,
    /// Ordered term values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Rendered instance name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    /// Rendered name with bracketed values.
    pub name: String,
    /// Rendered name as plain text.
    pub name_plain: String,
}

impl From<ParametrizedTemplateValue> for RenderOutput {
    fn from(value: ParametrizedTemplateValue) -> Self {
        Self {
            name: value.name,
            name_plain: value.name_plain,
        }
    }
}

/// Instantiates template text with the supplied entries.
///
/// # Errors
///
/// Returns [`mdr_core::LibraryError::Validation`] for invalid template text,
/// misaligned entries, a forbidden conjunction, or a rejected name override.
pub fn render_template(input: &RenderInput, config: &MdrConfig) -> LibraryResult<RenderOutput> {
    let rules = config.template_rules();
    let template = TemplateValue::new(
        input.template.clone(),
        None,
        input.editable_instance,
        &|_: &str| true,
        &rules,
    )?;
    let terms = term_lookup(&input.entries);
    let request = InstanceRequest {
        template_uid: ItemUid::new(RENDER_TEMPLATE_UID),
        as_of: None,
        name_override: input.name_override.clone(),
        parameters: input
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| entry_input(position, entry))
            .collect(),
    };
    let instance = match config.cache_settings() {
        Some(settings) => {
            let cached =
                CachedTemplateSource::new(InMemoryTemplateSource::new(), SystemClock, settings);
            publish_and_instantiate(&cached, template, &request, &terms, &rules)?
        }
        None => publish_and_instantiate(
            &InMemoryTemplateSource::new(),
            template,
            &request,
            &terms,
            &rules,
        )?,
    };
    debug!(entries = instance.parameters.len(), "template text rendered");
    Ok(instance.into())
}

/// Publishes `template` through `source` and instantiates it from there.
fn publish_and_instantiate<S>(
    source: &S,
    template: TemplateValue,
    request: &InstanceRequest,
    terms: &InMemoryTermLookup,
    rules: &TemplateRules,
) -> LibraryResult<ParametrizedTemplateValue>
where
    S: TemplateValueSource + TemplatePublisher,
{
    source.publish(&request.template_uid, template, OffsetDateTime::now_utc())?;
    TemplateInstantiator::new(source, terms, rules).instantiate(request)
}

/// Term uid of the value at `index` of the entry at `position`.
fn term_uid(position: usize, entry: &RenderEntry, index: usize) -> String {
    format!("{}:{}#{}", position + 1, entry.name, index + 1)
}

/// Registers every supplied value as a legal term of its placeholder.
fn term_lookup(entries: &[RenderEntry]) -> InMemoryTermLookup {
    entries.iter().enumerate().fold(InMemoryTermLookup::new(), |lookup, (position, entry)| {
        entry.values.iter().enumerate().fold(lookup, |lookup, (index, value)| {
            let term = ParameterTerm::simple(term_uid(position, entry, index), value);
            lookup.with_term(entry.name.clone(), term)
        })
    })
}

/// Converts a render entry into instantiation input.
fn entry_input(position: usize, entry: &RenderEntry) -> EntryInput {
    EntryInput {
        parameter_name: entry.name.clone(),
        conjunction: entry.conjunction.clone(),
        terms: entry
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| TermInput {
                uid: term_uid(position, entry, index).into(),
                value: Some(value.clone()),
            })
            .collect(),
        labels: Vec::new(),
    }
}
