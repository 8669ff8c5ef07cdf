// crates/mdr-cli/src/lib.rs
// ============================================================================
// Module: MDR CLI Library
// Description: Shared helpers for the mdr command-line interface.
// Purpose: Keep command logic testable outside the binary entry point.
// Dependencies: mdr-core, mdr-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! This library houses the pieces of the `mdr` binary that are worth testing
//! on their own: the message catalog, logging setup, template checks and
//! rendering, and lifecycle replay. The binary entry point (`src/main.rs`) only parses
//! arguments, reads inputs, and routes output through these helpers.
//!
//! Inputs are untrusted. Files are read with hard size limits and every
//! value passes the kernel's validation before anything is printed.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Tracing subscriber installation.
pub mod logging;
/// Lifecycle replay against an in-memory library.
pub mod replay;
/// Template syntax checks and ad hoc instantiation.
pub mod template;

#[cfg(test)]
mod tests;
