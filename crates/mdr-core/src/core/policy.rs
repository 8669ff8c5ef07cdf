// crates/mdr-core/src/core/policy.rs
// ============================================================================
// Module: Entity Policies
// Description: Entity kinds and the per-kind rules the aggregate enforces.
// Purpose: Replace per-entity aggregate subclasses with configuration.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every versioned item has an [`EntityKind`]. The kind selects an
//! [`ItemPolicy`] that switches the optional aggregate rules on or off:
//! name uniqueness, edits in a locked library, in-use guards, and frozen
//! template parameters. [`PolicyTable`] holds configured overrides and falls
//! back to the built-in defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Entity Kinds
// ============================================================================

/// Flavors of versioned library items.
///
/// # Invariants
/// - Variants are stable for serialization and configuration matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Activity concept.
    Activity,
    /// Activity instance concept.
    ActivityInstance,
    /// Unit definition concept.
    UnitDefinition,
    /// Objective template.
    ObjectiveTemplate,
    /// Criteria template.
    CriteriaTemplate,
    /// Endpoint template.
    EndpointTemplate,
    /// Timeframe template.
    TimeframeTemplate,
    /// Footnote template.
    FootnoteTemplate,
    /// Activity instruction template.
    ActivityInstructionTemplate,
    /// Objective instance.
    Objective,
    /// Criteria instance.
    Criteria,
    /// Endpoint instance.
    Endpoint,
    /// Timeframe instance.
    Timeframe,
    /// Footnote instance.
    Footnote,
}

impl EntityKind {
    /// Every entity kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Activity,
        Self::ActivityInstance,
        Self::UnitDefinition,
        Self::ObjectiveTemplate,
        Self::CriteriaTemplate,
        Self::EndpointTemplate,
        Self::TimeframeTemplate,
        Self::FootnoteTemplate,
        Self::ActivityInstructionTemplate,
        Self::Objective,
        Self::Criteria,
        Self::Endpoint,
        Self::Timeframe,
        Self::Footnote,
    ];

    /// Returns the stable configuration name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::ActivityInstance => "activity_instance",
            Self::UnitDefinition => "unit_definition",
            Self::ObjectiveTemplate => "objective_template",
            Self::CriteriaTemplate => "criteria_template",
            Self::EndpointTemplate => "endpoint_template",
            Self::TimeframeTemplate => "timeframe_template",
            Self::FootnoteTemplate => "footnote_template",
            Self::ActivityInstructionTemplate => "activity_instruction_template",
            Self::Objective => "objective",
            Self::Criteria => "criteria",
            Self::Endpoint => "endpoint",
            Self::Timeframe => "timeframe",
            Self::Footnote => "footnote",
        }
    }

    /// Returns true for template kinds.
    #[must_use]
    pub const fn is_template(self) -> bool {
        matches!(
            self,
            Self::ObjectiveTemplate
                | Self::CriteriaTemplate
                | Self::EndpointTemplate
                | Self::TimeframeTemplate
                | Self::FootnoteTemplate
                | Self::ActivityInstructionTemplate
        )
    }

    /// Returns the built-in policy of the kind.
    #[must_use]
    pub const fn default_policy(self) -> ItemPolicy {
        if self.is_template() {
            return ItemPolicy {
                unique_name: true,
                editable_in_locked_library: false,
                guard_in_use_on_retire: true,
                guard_in_use_on_delete: true,
                freeze_parameters_after_approval: true,
            };
        }
        ItemPolicy {
            unique_name: true,
            editable_in_locked_library: matches!(self, Self::UnitDefinition),
            guard_in_use_on_retire: false,
            guard_in_use_on_delete: false,
            freeze_parameters_after_approval: false,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Optional aggregate rules for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "Each flag toggles an independent aggregate rule."
)]
pub struct ItemPolicy {
    /// Names must be unique within a library.
    pub unique_name: bool,
    /// Transitions are allowed in a library that is not editable.
    pub editable_in_locked_library: bool,
    /// Retiring fails while the item is referenced.
    pub guard_in_use_on_retire: bool,
    /// Deleting fails while the item is referenced.
    pub guard_in_use_on_delete: bool,
    /// Approved items may not change their placeholders.
    pub freeze_parameters_after_approval: bool,
}

/// Configured policies keyed by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    /// Overrides of the built-in defaults.
    overrides: BTreeMap<EntityKind, ItemPolicy>,
}

impl PolicyTable {
    /// Creates a table holding only the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the policy of one kind.
    #[must_use]
    pub fn with_override(mut self, kind: EntityKind, policy: ItemPolicy) -> Self {
        self.overrides.insert(kind, policy);
        self
    }

    /// Returns the effective policy of a kind.
    #[must_use]
    pub fn policy(&self, kind: EntityKind) -> ItemPolicy {
        self.overrides.get(&kind).copied().unwrap_or_else(|| kind.default_policy())
    }
}
