// crates/mdr-cli/src/main.rs
// ============================================================================
// Module: MDR CLI Entry Point
// Description: Command dispatcher for template and lifecycle utilities.
// Purpose: Provide a safe command line front end to the library kernel.
// Dependencies: clap, mdr-cli, mdr-config, mdr-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `mdr` binary checks template text, renders template instances from a
//! JSON document, replays item lifecycles, and validates configuration. All
//! user-facing strings are routed through the message catalog. JSON output
//! goes to stdout; diagnostics and log events go to stderr. Every failure
//! exits with status 1.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use mdr_cli::logging;
use mdr_cli::replay::ReplayOptions;
use mdr_cli::replay::entity_kind_names;
use mdr_cli::replay::parse_entity_kind;
use mdr_cli::replay::replay;
use mdr_cli::t;
use mdr_cli::template::RenderInput;
use mdr_cli::template::check_template;
use mdr_cli::template::render_template;
use mdr_config::MdrConfig;
use mdr_config::config_toml_example;
use mdr_core::EntityKind;
use mdr_core::ObjectAction;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a render input document.
const MAX_RENDER_INPUT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "mdr", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to mdr.toml or the `MDR_CONFIG` override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Template text utilities.
    Template {
        /// Selected template subcommand.
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Item lifecycle utilities.
    Lifecycle {
        /// Selected lifecycle subcommand.
        #[command(subcommand)]
        command: LifecycleCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Template subcommands.
#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Check template syntax and list its placeholders.
    Check(TemplateCheckCommand),
    /// Render a template instance from a JSON document.
    Render(TemplateRenderCommand),
}

/// Lifecycle subcommands.
#[derive(Subcommand, Debug)]
enum LifecycleCommand {
    /// Replay actions against a fresh item and print its history.
    Replay(LifecycleReplayCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Check,
    /// Print the canonical example configuration.
    Example,
}

/// Arguments for template checks.
#[derive(Args, Debug)]
struct TemplateCheckCommand {
    /// Template text to check.
    #[arg(value_name = "TEXT")]
    text: String,
}

/// Arguments for template rendering.
#[derive(Args, Debug)]
struct TemplateRenderCommand {
    /// Path to the render input JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
}

/// Arguments for lifecycle replay.
#[derive(Args, Debug)]
struct LifecycleReplayCommand {
    /// Actions to apply, in order.
    #[arg(value_enum, value_name = "ACTION", required = true, num_args = 1 ..)]
    actions: Vec<ReplayActionArg>,
    /// Entity kind whose policy governs the item.
    #[arg(long, value_name = "KIND", default_value = "activity", value_parser = kind_arg)]
    kind: EntityKind,
    /// Item name.
    #[arg(long, value_name = "NAME", default_value = mdr_cli::replay::DEFAULT_ITEM_NAME)]
    name: String,
    /// Mark the item as referenced by other items.
    #[arg(long, action = ArgAction::SetTrue)]
    in_use: bool,
}

/// Replayable lifecycle actions.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ReplayActionArg {
    /// Approve the current draft.
    Approve,
    /// Edit the current draft.
    Edit,
    /// Open a new draft from a final version.
    NewVersion,
    /// Retire a final version.
    Inactivate,
    /// Reactivate a retired version.
    Reactivate,
    /// Delete a never-approved item.
    Delete,
}

impl From<ReplayActionArg> for ObjectAction {
    fn from(value: ReplayActionArg) -> Self {
        match value {
            ReplayActionArg::Approve => Self::Approve,
            ReplayActionArg::Edit => Self::Edit,
            ReplayActionArg::NewVersion => Self::NewVersion,
            ReplayActionArg::Inactivate => Self::Inactivate,
            ReplayActionArg::Reactivate => Self::Reactivate,
            ReplayActionArg::Delete => Self::Delete,
        }
    }
}

/// Parses `--kind` values.
fn kind_arg(value: &str) -> Result<EntityKind, String> {
    parse_entity_kind(value)
        .ok_or_else(|| t!("lifecycle.kind.unknown", kind = value, expected = entity_kind_names()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    if matches!(
        command,
        Commands::Config {
            command: ConfigCommand::Example,
        }
    ) {
        return command_config_example();
    }

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging)
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))?;

    match command {
        Commands::Template {
            command,
        } => command_template(command, &config),
        Commands::Lifecycle {
            command,
        } => command_lifecycle(command, &config),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Loads and validates the configuration.
fn load_config(path: Option<&Path>) -> CliResult<MdrConfig> {
    MdrConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Template Commands
// ============================================================================

/// Dispatches template subcommands.
fn command_template(command: TemplateCommand, config: &MdrConfig) -> CliResult<ExitCode> {
    match command {
        TemplateCommand::Check(command) => command_template_check(&command, config),
        TemplateCommand::Render(command) => command_template_render(&command, config),
    }
}

/// Executes the template check command.
///
/// Invalid text is reported on stderr with exit status 1.
fn command_template_check(
    command: &TemplateCheckCommand,
    config: &MdrConfig,
) -> CliResult<ExitCode> {
    let check = match check_template(&command.text, &config.template_rules()) {
        Ok(check) => check,
        Err(err) => {
            write_stderr_line(&t!("template.check.invalid", error = err))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut lines = vec![t!("template.check.valid", count = check.placeholders.len())];
    lines.extend(check.placeholders.iter().map(|placeholder| {
        t!(
            "template.check.placeholder",
            name = placeholder.name,
            start = placeholder.start,
            end = placeholder.end
        )
    }));
    lines.push(t!("template.check.plain", text = check.name_plain));
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the template render command.
fn command_template_render(
    command: &TemplateRenderCommand,
    config: &MdrConfig,
) -> CliResult<ExitCode> {
    let input: RenderInput =
        read_json_input(&command.input, "render input", MAX_RENDER_INPUT_BYTES)?;
    let output = render_template(&input, config)
        .map_err(|err| CliError::new(t!("template.render.failed", error = err)))?;
    write_json(&output, "render output")?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Lifecycle Commands
// ============================================================================

/// Dispatches lifecycle subcommands.
fn command_lifecycle(command: LifecycleCommand, config: &MdrConfig) -> CliResult<ExitCode> {
    match command {
        LifecycleCommand::Replay(command) => command_lifecycle_replay(command, config),
    }
}

/// Executes the lifecycle replay command.
fn command_lifecycle_replay(
    command: LifecycleReplayCommand,
    config: &MdrConfig,
) -> CliResult<ExitCode> {
    let actions: Vec<ObjectAction> = command.actions.into_iter().map(ObjectAction::from).collect();
    let options = ReplayOptions {
        kind: command.kind,
        name: command.name,
        in_use: command.in_use,
    };
    let report = replay(&actions, &options, config)
        .map_err(|err| CliError::new(t!("lifecycle.replay.failed", error = err)))?;
    write_json(&report, "replay report")?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
///
/// The config is already loaded and validated when this runs.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Check => {
            write_stdout_line(&t!("config.check.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Example => command_config_example(),
    }
}

/// Prints the canonical example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    let example = config_toml_example();
    write_stdout_line(example.trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors raised while reading size-limited inputs.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a size-limited JSON input file.
fn read_json_input<T: DeserializeOwned>(
    path: &Path,
    kind: &str,
    max_bytes: usize,
) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = err
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a value to stdout as pretty-printed JSON.
fn write_json<T: Serialize>(value: &T, kind: &str) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", kind = kind, error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Formats an output failure for the given stream.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
