// crates/mdr-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures for library kernel integration tests.
// ============================================================================
//! ## Overview
//! In-memory ports wired together, plus small builders for common payloads.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;

use mdr_core::AuthorId;
use mdr_core::Collaborators;
use mdr_core::ConceptValue;
use mdr_core::FixedClock;
use mdr_core::InMemoryItemRepository;
use mdr_core::Library;
use mdr_core::LibraryPayload;
use mdr_core::SequentialUidGenerator;
use mdr_core::TemplateRules;
use time::OffsetDateTime;
use time::macros::datetime;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across kernel integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Fixtures
// ========================================================================

/// Start of every test clock.
pub const EPOCH: OffsetDateTime = datetime!(2026-01-05 09:00 UTC);

/// In-memory ports shared by one test.
pub struct Harness<P> {
    /// Item store; also answers uniqueness and usage questions.
    pub repository: InMemoryItemRepository<P>,
    /// Uid allocation.
    pub uids: SequentialUidGenerator,
    /// Controllable clock.
    pub clock: FixedClock,
    /// Authoring rules.
    pub rules: TemplateRules,
}

impl<P: LibraryPayload> Default for Harness<P> {
    fn default() -> Self {
        Self {
            repository: InMemoryItemRepository::new(),
            uids: SequentialUidGenerator::new("Item"),
            clock: FixedClock::new(EPOCH),
            rules: TemplateRules::default(),
        }
    }
}

impl<P: LibraryPayload> Harness<P> {
    /// Creates a harness with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ports as aggregate collaborators.
    pub fn ports(&self) -> Collaborators<'_> {
        Collaborators {
            uid_generator: &self.uids,
            uniqueness: &self.repository,
            usage: &self.repository,
            clock: &self.clock,
            rules: &self.rules,
        }
    }
}

/// Default author.
pub fn author() -> AuthorId {
    AuthorId::new("author-1")
}

/// Editable sponsor library.
pub fn sponsor_library() -> Library {
    Library::new("Sponsor", true)
}

/// Locked reference library.
pub fn locked_library() -> Library {
    Library::new("CDISC", false)
}

/// Concept payload with a sentence-case name.
pub fn concept(name: &str) -> ConceptValue {
    ConceptValue::new(name).with_sentence_case(name.to_lowercase())
}
