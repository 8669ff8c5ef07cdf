// crates/mdr-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `mdr config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The canonical `mdr.toml`. It spells out every default plus one entity
//! override, and must always load cleanly.

/// Returns a canonical example `mdr.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[logging]
filter = "info"
format = "compact"

[templates]
allowed_conjunctions = ["", "and", "or", ","]
max_template_bytes = 65536

[cache]
enabled = true
ttl_ms = 60000
max_entries = 1024

[[entities]]
kind = "objective_template"
unique_name = true
editable_in_locked_library = false
guard_in_use_on_retire = true
guard_in_use_on_delete = true
freeze_parameters_after_approval = true

[[entities]]
kind = "activity"
guard_in_use_on_retire = true
"#,
    )
}
