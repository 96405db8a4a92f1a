// crates/config-exports-cli/src/main.rs
// ============================================================================
// Module: Config Exports CLI Entry Point
// Description: Command dispatcher for serving and inspecting config exports.
// Purpose: Provide a safe CLI for the export server and offline exports.
// Dependencies: clap, config-exports-config, config-exports-core,
//               config-exports-server, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The Config Exports CLI starts the HTTP export server and runs one-off
//! exports against a config file. Every command loads and validates the
//! configuration first and fails closed on any error. Security posture: key
//! lists supplied on the command line are untrusted and go through the same
//! whitelist checks as HTTP requests.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use config_exports_config::ConfigExportsConfig;
use config_exports_config::config_toml_example;
use config_exports_core::RequestedKeys;
use config_exports_core::render_script;
use config_exports_server::ExportServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "config-exports", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP export server.
    Serve(ConfigArgs),
    /// Print exported configuration as JSON.
    Export(ExportCommand),
    /// Print the client-side `mw.config.set(...)` script for default keys.
    Script(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Shared config path argument.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to config-exports.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `export`.
#[derive(Args, Debug)]
struct ExportCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Keys to export, delimited by `,` or `|` (defaults when omitted).
    #[arg(long, value_name = "KEYS")]
    keys: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigArgs),
    /// Print a canonical example config file.
    Example,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("config-exports {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(&command).await,
        Commands::Export(command) => command_export(&command),
        Commands::Script(command) => command_script(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let server = ExportServer::from_config(&config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("config-exports: serving on http://{}", server.bind_addr()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Export Commands
// ============================================================================

/// Executes the `export` command.
fn command_export(command: &ExportCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    let exporter =
        config.build_exporter().map_err(|err| CliError::new(format!("export failed: {err}")))?;
    let requested = command.keys.as_deref().and_then(RequestedKeys::parse_delimited);
    let exported = exporter
        .export(&config.config_source(), config.whitelist().as_ref(), requested.as_ref())
        .map_err(|err| CliError::new(format!("export failed: {err}")))?;
    let output = serde_json::to_string_pretty(&exported)
        .map_err(|err| CliError::new(format!("export serialization failed: {err}")))?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `script` command.
fn command_script(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let exporter =
        config.build_exporter().map_err(|err| CliError::new(format!("script failed: {err}")))?;
    let script = render_script(&exporter, &config.config_source(), config.whitelist().as_ref())
        .map_err(|err| CliError::new(format!("script failed: {err}")))?;
    write_stdout_line(&script).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    if config.whitelist().is_none() {
        write_stderr_line("config-exports: WARNING: no whitelist configured; exports will fail")
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<ConfigExportsConfig> {
    ConfigExportsConfig::load(path)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints CLI help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_bytes(help.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
