// crates/mdr-core/src/lib.rs
// ============================================================================
// Module: MDR Core Root
// Description: Versioned library kernel for clinical metadata items.
// Purpose: Expose core types, ports, and the runtime engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Library items (activities, unit definitions, syntax templates and their
//! instances) are drafted, approved, superseded, retired and reactivated.
//! Every transition is tracked with a `major.minor` version and an
//! append-only metadata history.
//!
//! - [`core`]: value objects, metadata transitions, policies, errors.
//! - [`interfaces`]: ports for uids, lookups, usage, time, and storage.
//! - [`runtime`]: the generic aggregate, template instantiation, the
//!   transaction boundary, in-memory adapters, and the template cache.

pub mod core;
pub mod interfaces;
pub mod runtime;

pub use crate::core::*;
pub use crate::interfaces::*;
pub use crate::runtime::*;
