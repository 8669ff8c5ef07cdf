// crates/mdr-config/src/lib.rs
// ============================================================================
// Module: MDR Config Library
// Description: Canonical config model, validation, and example payloads.
// Purpose: Single source of truth for mdr.toml semantics.
// Dependencies: mdr-core, placeholder-logic, serde, toml
// ============================================================================

//! ## Overview
//! `mdr-config` defines the configuration model for the library kernel and
//! its command line front end. Loading is strict and fails closed: oversized
//! files, overlong paths, and out-of-range values are errors. Omitted
//! sections fall back to the kernel defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
