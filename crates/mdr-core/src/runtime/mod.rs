// crates/mdr-core/src/runtime/mod.rs
// ============================================================================
// Module: MDR Runtime
// Description: Aggregate engine, instantiation, service boundary, and adapters.
// Purpose: Execute library operations against injected ports.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime code drives the core types through the ports in
//! [`crate::interfaces`]. It is synchronous and single-threaded per call;
//! concurrency control belongs to the storage layer behind the ports.

pub mod aggregate;
pub mod cache;
pub mod instantiate;
pub mod service;
pub mod store;

pub use aggregate::DELETED_MESSAGE;
pub use aggregate::EditOutcome;
pub use aggregate::VersionedItem;
pub use cache::CacheSettings;
pub use cache::CachedTemplateSource;
pub use instantiate::InstanceRequest;
pub use instantiate::TemplateInstantiator;
pub use service::LibraryService;
pub use service::LifecycleCommand;
pub use store::FixedClock;
pub use store::InMemoryItemRepository;
pub use store::InMemoryTemplateSource;
pub use store::InMemoryTermLookup;
pub use store::SequentialUidGenerator;
pub use store::SystemClock;
