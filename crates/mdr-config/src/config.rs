// crates/mdr-config/src/config.rs
// ============================================================================
// Module: MDR Configuration
// Description: Configuration loading and validation for the library kernel.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: mdr-core, placeholder-logic, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, else the `MDR_CONFIG` environment variable,
//! else `mdr.toml` in the working directory. Only the implicit default file
//! may be absent; every section then takes its default.
//!
//! The validated model converts into the kernel's [`TemplateRules`],
//! [`CacheSettings`], and [`PolicyTable`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use mdr_core::CacheSettings;
use mdr_core::ConjunctionSet;
use mdr_core::DEFAULT_CONJUNCTIONS;
use mdr_core::DEFAULT_MAX_TEMPLATE_BYTES;
use mdr_core::EntityKind;
use mdr_core::ItemPolicy;
use mdr_core::PolicyTable;
use mdr_core::TemplateRules;
use placeholder_logic::MAX_TEMPLATE_BYTES;
use serde::Deserialize;
use thiserror::Error;
use time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "mdr.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "MDR_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a log filter directive.
pub(crate) const MAX_LOG_FILTER_LENGTH: usize = 1024;
/// Maximum length of one conjunction.
pub(crate) const MAX_CONJUNCTION_LENGTH: usize = 16;
/// Minimum template cache time-to-live in milliseconds.
pub(crate) const MIN_CACHE_TTL_MS: u64 = 100;
/// Maximum template cache time-to-live in milliseconds (one day).
pub(crate) const MAX_CACHE_TTL_MS: u64 = 86_400_000;
/// Default template cache time-to-live in milliseconds.
pub(crate) const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
/// Default template cache capacity.
pub(crate) const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Library kernel configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MdrConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Template authoring rules.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Template lookup cache.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Per-kind policy overrides.
    #[serde(default)]
    pub entities: Vec<EntityPolicyConfig>,
}

impl MdrConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.templates.validate()?;
        self.cache.validate()?;
        let mut kinds = BTreeSet::new();
        for entity in &self.entities {
            if !kinds.insert(entity.kind) {
                return Err(ConfigError::Invalid(format!(
                    "entities.kind {} is configured more than once",
                    entity.kind
                )));
            }
        }
        Ok(())
    }

    /// Returns the template authoring rules.
    #[must_use]
    pub fn template_rules(&self) -> TemplateRules {
        TemplateRules {
            conjunctions: ConjunctionSet::new(self.templates.allowed_conjunctions.iter().cloned()),
            max_template_bytes: self.templates.max_template_bytes,
        }
    }

    /// Returns the cache settings, or `None` when caching is disabled.
    #[must_use]
    pub fn cache_settings(&self) -> Option<CacheSettings> {
        if !self.cache.enabled {
            return None;
        }
        Some(CacheSettings {
            ttl: i64::try_from(self.cache.ttl_ms).map_or(Duration::MAX, Duration::milliseconds),
            max_entries: self.cache.max_entries,
        })
    }

    /// Returns the effective policy table.
    #[must_use]
    pub fn policy_table(&self) -> PolicyTable {
        self.entities.iter().fold(PolicyTable::new(), |table, entity| {
            table.with_override(entity.kind, entity.policy())
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `mdr_core=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must be non-empty".to_string()));
        }
        if self.filter.len() > MAX_LOG_FILTER_LENGTH {
            return Err(ConfigError::Invalid("logging.filter exceeds max length".to_string()));
        }
        Ok(())
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Single-line human readable output.
    #[default]
    Compact,
    /// Newline-delimited JSON objects.
    Json,
}

/// Template authoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplatesConfig {
    /// Conjunctions entries may use; the empty string means a comma list.
    #[serde(default = "default_allowed_conjunctions")]
    pub allowed_conjunctions: Vec<String>,
    /// Maximum template size in bytes.
    #[serde(default = "default_max_template_bytes")]
    pub max_template_bytes: usize,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            allowed_conjunctions: default_allowed_conjunctions(),
            max_template_bytes: default_max_template_bytes(),
        }
    }
}

impl TemplatesConfig {
    /// Validates template configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_conjunctions.is_empty() {
            return Err(ConfigError::Invalid(
                "templates.allowed_conjunctions must be non-empty".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for conjunction in &self.allowed_conjunctions {
            if conjunction.len() > MAX_CONJUNCTION_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "templates.allowed_conjunctions entry '{conjunction}' exceeds \
                     {MAX_CONJUNCTION_LENGTH} bytes"
                )));
            }
            if !seen.insert(conjunction.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "templates.allowed_conjunctions entry '{conjunction}' is duplicated"
                )));
            }
        }
        if self.max_template_bytes == 0 || self.max_template_bytes > MAX_TEMPLATE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "templates.max_template_bytes must be between 1 and {MAX_TEMPLATE_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Template lookup cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Enables the cache.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Entry time-to-live in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub ttl_ms: u64,
    /// Maximum number of cached templates.
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_ms: default_cache_ttl_ms(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl CacheConfig {
    /// Validates cache configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_ttl_range("cache.ttl_ms", self.ttl_ms, MIN_CACHE_TTL_MS, MAX_CACHE_TTL_MS)?;
        if self.enabled && self.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Policy override for one entity kind; omitted flags keep the kind default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityPolicyConfig {
    /// Entity kind the override applies to.
    pub kind: EntityKind,
    /// Names must be unique within a library.
    #[serde(default)]
    pub unique_name: Option<bool>,
    /// Transitions are allowed in a locked library.
    #[serde(default)]
    pub editable_in_locked_library: Option<bool>,
    /// Retiring fails while the item is referenced.
    #[serde(default)]
    pub guard_in_use_on_retire: Option<bool>,
    /// Deleting fails while the item is referenced.
    #[serde(default)]
    pub guard_in_use_on_delete: Option<bool>,
    /// Approved items may not change their placeholders.
    #[serde(default)]
    pub freeze_parameters_after_approval: Option<bool>,
}

impl EntityPolicyConfig {
    /// Returns the kind default with the configured flags applied.
    #[must_use]
    pub const fn policy(&self) -> ItemPolicy {
        let base = self.kind.default_policy();
        ItemPolicy {
            unique_name: or_default(self.unique_name, base.unique_name),
            editable_in_locked_library: or_default(
                self.editable_in_locked_library,
                base.editable_in_locked_library,
            ),
            guard_in_use_on_retire: or_default(
                self.guard_in_use_on_retire,
                base.guard_in_use_on_retire,
            ),
            guard_in_use_on_delete: or_default(
                self.guard_in_use_on_delete,
                base.guard_in_use_on_delete,
            ),
            freeze_parameters_after_approval: or_default(
                self.freeze_parameters_after_approval,
                base.freeze_parameters_after_approval,
            ),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is false for the implicit default.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a millisecond value against an inclusive range.
fn validate_ttl_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Picks the configured flag or the default.
const fn or_default(value: Option<bool>, default: bool) -> bool {
    match value {
        Some(value) => value,
        None => default,
    }
}

/// Default log filter.
fn default_log_filter() -> String {
    "info".to_string()
}

/// Default allowed conjunctions.
fn default_allowed_conjunctions() -> Vec<String> {
    DEFAULT_CONJUNCTIONS.iter().map(|conjunction| (*conjunction).to_string()).collect()
}

/// Default template size limit.
const fn default_max_template_bytes() -> usize {
    DEFAULT_MAX_TEMPLATE_BYTES
}

/// Caching is on unless disabled.
const fn default_cache_enabled() -> bool {
    true
}

/// Default cache time-to-live.
const fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

/// Default cache capacity.
const fn default_cache_max_entries() -> usize {
    DEFAULT_CACHE_MAX_ENTRIES
}

// ============================================================================
// SECTION: Tests
// ============================================================================
