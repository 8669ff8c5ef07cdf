// crates/mdr-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Installs the tracing subscriber for the mdr binary.
// Purpose: Route kernel events to stderr in the configured format.
// Dependencies: mdr-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! Events go to stderr so that stdout carries only command output. The
//! filter directive comes from `logging.filter` unless `MDR_LOG` is set to a
//! non-blank value, in which case the environment wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mdr_config::LogFormat;
use mdr_config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV_VAR: &str = "MDR_LOG";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Rejected directive.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("subscriber install failed: {0}")]
    Install(String),
}

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Builds the filter from config and an optional environment override.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when the chosen directive does not
/// parse.
pub fn env_filter(
    config: &LoggingConfig,
    env_override: Option<&str>,
) -> Result<EnvFilter, LoggingError> {
    let directive = env_override
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(config.filter.as_str());
    EnvFilter::try_new(directive).map_err(|err| LoggingError::InvalidFilter {
        filter: directive.to_string(),
        reason: err.to_string(),
    })
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = env_filter(config, env_value.as_deref())?;
    let installed = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|err| LoggingError::Install(err.to_string()))
}
