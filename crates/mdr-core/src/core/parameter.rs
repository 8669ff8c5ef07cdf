// crates/mdr-core/src/core/parameter.rs
// ============================================================================
// Module: Parameter Terms
// Description: Values bound to template placeholders and their rendering.
// Purpose: Validate and render the ordered terms that fill one placeholder.
// Dependencies: crate::core::{error, identifiers}, crate::interfaces,
// placeholder-logic, bigdecimal, serde
// ============================================================================

//! ## Overview
//! A placeholder is filled by a [`ParameterEntry`]: an ordered list of
//! [`ParameterTerm`]s joined with a conjunction. Terms come in three shapes:
//!
//! - `Simple`: a terminology value such as `"Weight"`.
//! - `Numeric`: a decimal value such as `5`.
//! - `Complex`: a sub-template whose own placeholders are filled by child
//!   terms, for example `"[Number] [Unit]"` with children `5` and `mg`.
//!
//! Entry rendering joins the term values: one term renders as itself, two as
//! `a and b`, three or more as `a, b and c`. A blank or `,` conjunction
//! renders a plain comma list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use bigdecimal::BigDecimal;
use placeholder_logic::extract_placeholders;
use placeholder_logic::substitute;
use serde::Deserialize;
use serde::Serialize;

use crate::core::error::LibraryError;
use crate::core::error::LibraryResult;
use crate::core::identifiers::TermUid;
use crate::interfaces::ParameterTermLookup;

// ============================================================================
// SECTION: Terms
// ============================================================================

/// A value that can fill a template placeholder.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterTerm {
    /// Terminology-backed text value.
    Simple {
        /// Term identifier.
        uid: TermUid,
        /// Display value.
        value: String,
        /// Optional display labels.
        #[serde(default)]
        labels: Vec<String>,
    },
    /// Numeric value.
    Numeric {
        /// Term identifier.
        uid: TermUid,
        /// Decimal value.
        value: BigDecimal,
    },
    /// Sub-template filled by child terms.
    Complex(ComplexTerm),
}

impl ParameterTerm {
    /// Creates a simple term without labels.
    #[must_use]
    pub fn simple(uid: impl Into<TermUid>, value: impl Into<String>) -> Self {
        Self::Simple {
            uid: uid.into(),
            value: value.into(),
            labels: Vec::new(),
        }
    }

    /// Creates a numeric term.
    #[must_use]
    pub fn numeric(uid: impl Into<TermUid>, value: BigDecimal) -> Self {
        Self::Numeric {
            uid: uid.into(),
            value,
        }
    }

    /// Returns the term identifier.
    #[must_use]
    pub const fn uid(&self) -> &TermUid {
        match self {
            Self::Simple {
                uid, ..
            }
            | Self::Numeric {
                uid, ..
            } => uid,
            Self::Complex(term) => &term.uid,
        }
    }

    /// Returns the rendered value of the term.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when a complex term cannot be
    /// rendered from its children.
    pub fn value(&self) -> LibraryResult<String> {
        match self {
            Self::Simple {
                value, ..
            } => Ok(value.clone()),
            Self::Numeric {
                value, ..
            } => Ok(value.to_string()),
            Self::Complex(term) => term.value(),
        }
    }
}

/// A term whose value is a sub-template filled by child terms.
///
/// # Invariants
/// - The sub-template has one placeholder per child, or exactly one
///   placeholder that receives all children joined with `conjunction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexTerm {
    /// Term identifier.
    pub uid: TermUid,
    /// Sub-template text with its own placeholders.
    pub template: String,
    /// Conjunction used when one placeholder receives several children.
    #[serde(default)]
    pub conjunction: String,
    /// Ordered child terms.
    pub children: Vec<ParameterTerm>,
}

impl ComplexTerm {
    /// Creates a complex term after checking the child count.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the sub-template is invalid or
    /// the number of children does not fit its placeholders.
    pub fn new(
        uid: impl Into<TermUid>,
        template: impl Into<String>,
        conjunction: impl Into<String>,
        children: Vec<ParameterTerm>,
    ) -> LibraryResult<Self> {
        let term = Self {
            uid: uid.into(),
            template: template.into(),
            conjunction: conjunction.into(),
            children,
        };
        term.check_arity(extract_placeholders(&term.template)?.len())?;
        Ok(term)
    }

    /// Substitutes the child values into the sub-template.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when the child count does not fit
    /// the sub-template.
    pub fn value(&self) -> LibraryResult<String> {
        let slots = extract_placeholders(&self.template)?.len();
        self.check_arity(slots)?;
        let values =
            self.children.iter().map(ParameterTerm::value).collect::<LibraryResult<Vec<_>>>()?;
        if slots == values.len() {
            Ok(substitute(&self.template, &values)?)
        } else {
            Ok(substitute(&self.template, &[join_values(&values, &self.conjunction)])?)
        }
    }

    /// Checks the child count against the placeholder count.
    fn check_arity(&self, slots: usize) -> LibraryResult<()> {
        let children = self.children.len();
        if slots == children || (slots == 1 && children > 1) {
            return Ok(());
        }
        Err(LibraryError::Validation(format!(
            "complex term {} has {slots} placeholders but {children} child terms",
            self.uid
        )))
    }
}

// ============================================================================
// SECTION: Conjunctions
// ============================================================================

/// Conjunctions accepted when no configuration overrides them.
pub const DEFAULT_CONJUNCTIONS: [&str; 4] = ["", "and", "or", ","];

/// Set of conjunctions an entry may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConjunctionSet(BTreeSet<String>);

impl ConjunctionSet {
    /// Builds a set from the given conjunctions.
    pub fn new<I, S>(conjunctions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(conjunctions.into_iter().map(Into::into).collect())
    }

    /// Returns true when the conjunction is allowed.
    #[must_use]
    pub fn contains(&self, conjunction: &str) -> bool {
        self.0.contains(conjunction)
    }

    /// Iterates the allowed conjunctions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ConjunctionSet {
    fn default() -> Self {
        Self::new(DEFAULT_CONJUNCTIONS)
    }
}

/// Joins rendered values with a conjunction.
#[must_use]
pub fn join_values(values: &[String], conjunction: &str) -> String {
    let conjunction = conjunction.trim();
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] if !(conjunction.is_empty() || conjunction == ",") => {
            format!("{} {conjunction} {last}", head.join(", "))
        }
        _ => values.join(", "),
    }
}

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Caller-supplied reference to a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInput {
    /// Term identifier.
    pub uid: TermUid,
    /// Value the caller expects the term to have.
    #[serde(default)]
    pub value: Option<String>,
}

/// Caller-supplied binding for one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    /// Placeholder name.
    pub parameter_name: String,
    /// Conjunction joining the terms.
    #[serde(default)]
    pub conjunction: String,
    /// Ordered term references.
    #[serde(default)]
    pub terms: Vec<TermInput>,
    /// Optional display labels.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Resolved binding of one placeholder.
///
/// # Invariants
/// - `parameter_name` is declared by the template the entry belongs to.
/// - `conjunction` is in the configured set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEntry {
    /// Placeholder name.
    pub parameter_name: String,
    /// Conjunction joining the terms.
    #[serde(default)]
    pub conjunction: String,
    /// Ordered terms.
    #[serde(default)]
    pub terms: Vec<ParameterTerm>,
    /// Optional display labels.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ParameterEntry {
    /// Creates an entry from already resolved terms.
    #[must_use]
    pub fn new(
        parameter_name: impl Into<String>,
        conjunction: impl Into<String>,
        terms: Vec<ParameterTerm>,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            conjunction: conjunction.into(),
            terms,
            labels: Vec::new(),
        }
    }

    /// Resolves caller input into an entry.
    ///
    /// Checks run in order: the placeholder is declared, every term is legal
    /// for it, and the conjunction is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] naming the first failed check, or
    /// [`LibraryError::Port`] when the lookup fails.
    pub fn from_input<L>(
        input: &EntryInput,
        declared: &[String],
        lookup: &L,
        conjunctions: &ConjunctionSet,
    ) -> LibraryResult<Self>
    where
        L: ParameterTermLookup + ?Sized,
    {
        let name = &input.parameter_name;
        if !declared.iter().any(|declared_name| declared_name == name) {
            return Err(LibraryError::Validation(format!(
                "parameter [{name}] is not declared by the template"
            )));
        }
        let mut terms = Vec::with_capacity(input.terms.len());
        for term in &input.terms {
            match lookup.find_term(name, &term.uid, term.value.as_deref())? {
                Some(resolved) => terms.push(resolved),
                None => {
                    return Err(LibraryError::Validation(format!(
                        "term {} is not a valid value for parameter [{name}]",
                        term.uid
                    )));
                }
            }
        }
        if !conjunctions.contains(&input.conjunction) {
            return Err(LibraryError::Validation(format!(
                "conjunction '{}' is not allowed",
                input.conjunction
            )));
        }
        Ok(Self {
            parameter_name: name.clone(),
            conjunction: input.conjunction.clone(),
            terms,
            labels: input.labels.clone(),
        })
    }

    /// Renders the entry as text.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] when a complex term cannot be
    /// rendered.
    pub fn render(&self) -> LibraryResult<String> {
        let values =
            self.terms.iter().map(ParameterTerm::value).collect::<LibraryResult<Vec<_>>>()?;
        Ok(join_values(&values, &self.conjunction))
    }
}
