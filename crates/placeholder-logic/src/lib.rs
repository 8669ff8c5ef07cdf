// crates/placeholder-logic/src/lib.rs
// ============================================================================
// Module: Placeholder Logic Root
// Description: Public API surface for the template placeholder engine.
// Purpose: Wire together scanning, rendering, and error modules.
// Dependencies: crate::{error, render, scanner}
// ============================================================================

//! ## Overview
//! This crate parses the bracket placeholders used by syntax templates
//! (`"[Activity] at [Visit]"`), validates their syntax in a single pass, and
//! fills them positionally with rendered values. It has no knowledge of
//! parameter terms or versioning; those live in `mdr-core`.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod error;
pub mod render;
pub mod scanner;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::PlaceholderError;
pub use error::PlaceholderResult;
pub use render::plain_text;
pub use render::strip_brackets;
pub use render::strip_markup;
pub use render::substitute;
pub use render::substitute_bracketed;
pub use scanner::MAX_TEMPLATE_BYTES;
pub use scanner::Placeholder;
pub use scanner::extract_placeholders;
pub use scanner::is_syntax_valid;
pub use scanner::is_valid_placeholder_name;
pub use scanner::same_placeholders;
pub use scanner::scan_placeholders;
pub use scanner::scan_with_limit;
