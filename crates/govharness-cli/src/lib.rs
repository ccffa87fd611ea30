// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use govharness_adapters::{AzCliScopeLookup, AzCliSessionProvider, RealCommandRunner};
use govharness_config::{
    base_config_path, catalog_path, evaluate_catalog, generate_name, has_errors, validate,
    HarnessData, Role,
};
use govharness_core::{
    resolve_workspace_root, ExitCode, HarnessError, MachineError, ENV_GOVHARNESS_ENVIRONMENT,
    ENV_GOVHARNESS_LOG_LEVEL, ENV_GOVHARNESS_ROOT,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{CatalogCommand, Commands, PolicySelector};
use output::{emit_error, emit_ok};

const GOVHARNESS_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "govharness")]
#[command(version, about = "Governance policy test harness CLI")]
#[command(help_template = GOVHARNESS_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  GOVHARNESS_ROOT          Workspace root holding configs/harness\n  GOVHARNESS_ENVIRONMENT   Default environment id\n  GOVHARNESS_LOG_LEVEL     Log verbosity override"
)]
struct Cli {
    /// Workspace root holding configs/harness.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    #[arg(long = "log-json", global = true, default_value_t = false)]
    log_json: bool,
    #[arg(long = "print-config-paths", default_value_t = false)]
    print_config_paths: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
    trace: bool,
    json: bool,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }
}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        Self {
            exit_code: err.exit_code(),
            machine: err.to_machine_error(),
        }
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    init_tracing(LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.log_json,
    });

    if cli.print_config_paths {
        return emit_config_paths(cli.root.as_deref(), output_mode);
    }
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;

    match command {
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
        Commands::Version => emit_ok(
            output_mode,
            &json!({"command": "version", "name": "govharness", "version": env!("CARGO_PKG_VERSION")}),
        ),
        command => {
            let owned;
            let data: &HarnessData = match cli.root.as_deref() {
                Some(root) => {
                    owned = HarnessData::load_from_workspace(root)?;
                    &owned
                }
                None => HarnessData::global()?,
            };
            run_data_command(data, command, output_mode)
        }
    }
}

fn run_data_command(
    data: &HarnessData,
    command: Commands,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    match command {
        Commands::Resolve { selector } => {
            let config = resolve_selected(data, &selector)?;
            let fingerprint = config
                .fingerprint()
                .map_err(|e| CliError::internal(e.to_string()))?;
            emit_ok(
                output_mode,
                &json!({"command": "resolve", "fingerprint": fingerprint, "config": config}),
            )
        }
        Commands::Name { selector, role } => {
            let role: Role = role.parse()?;
            let config = resolve_selected(data, &selector)?;
            let name = generate_name(&config, role)?;
            emit_ok(
                output_mode,
                &json!({
                    "command": "name",
                    "policy": format!("{}/{}", selector.category, selector.policy),
                    "role": role.key(),
                    "name": name.as_str(),
                    "maxNameLength": config.naming.max_name_length,
                }),
            )
        }
        Commands::Path {
            category,
            policy,
            from,
        } => {
            let caller_root = from.unwrap_or_else(|| PathBuf::from("."));
            let path = data.resolve_path(&category, &policy, &caller_root)?;
            emit_ok(
                output_mode,
                &json!({"command": "path", "policy": format!("{category}/{policy}"), "path": path}),
            )
        }
        Commands::Validate { selector } => run_validate(data, &selector, output_mode),
        Commands::Catalog { command } => match command {
            CatalogCommand::List { category } => {
                if let Some(category) = category.as_deref() {
                    if !data.catalog().policies.contains_key(category) {
                        return Err(HarnessError::not_found("category", category).into());
                    }
                }
                let entries: Vec<_> = data
                    .catalog()
                    .entries(category.as_deref())
                    .map(|entry| {
                        json!({
                            "category": entry.category,
                            "name": entry.name,
                            "displayName": entry.display_name,
                            "definitionRelativePath": entry.definition_relative_path,
                        })
                    })
                    .collect();
                emit_ok(
                    output_mode,
                    &json!({"command": "catalog list", "count": entries.len(), "entries": entries}),
                )
            }
            CatalogCommand::Lint => {
                let violations = evaluate_catalog(data.catalog(), data.base());
                let failed = has_errors(&violations);
                emit_ok(
                    output_mode,
                    &json!({
                        "command": "catalog lint",
                        "status": if failed { "failed" } else { "ok" },
                        "violations": violations,
                    }),
                )?;
                if failed {
                    return Err(CliError {
                        exit_code: ExitCode::Validation,
                        machine: MachineError::new("catalog_lint_failed", "catalog lint reported errors")
                            .with_detail("violations", &violations.len().to_string()),
                    });
                }
                Ok(())
            }
        },
        Commands::Modules { group } => {
            let modules = data.required_modules(&group)?;
            emit_ok(
                output_mode,
                &json!({"command": "modules", "group": group, "modules": modules}),
            )
        }
        Commands::Tags { purpose } => {
            let tags = data.tags_for(&purpose)?;
            emit_ok(
                output_mode,
                &json!({"command": "tags", "purpose": purpose, "tags": tags}),
            )
        }
        Commands::Completion { .. } | Commands::Version => Ok(()),
    }
}

fn resolve_selected(
    data: &HarnessData,
    selector: &PolicySelector,
) -> Result<govharness_config::EffectiveConfiguration, HarnessError> {
    data.resolve(
        &selector.category,
        &selector.policy,
        selector.environment.as_deref(),
    )
}

fn run_validate(
    data: &HarnessData,
    selector: &PolicySelector,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let config = resolve_selected(data, selector)?;
    let sessions = AzCliSessionProvider::new(RealCommandRunner);
    let scopes = AzCliScopeLookup::new(RealCommandRunner);
    let result = validate(&config, &sessions, &scopes);
    emit_ok(
        output_mode,
        &json!({"command": "validate", "environment": config.environment, "result": result}),
    )?;
    if result.success {
        return Ok(());
    }
    Err(CliError {
        exit_code: ExitCode::DependencyFailure,
        machine: MachineError::new("validation_failed", &result.errors.join("; "))
            .with_detail("environment", config.environment.as_str()),
    })
}

fn emit_config_paths(root: Option<&Path>, output_mode: OutputMode) -> Result<(), CliError> {
    let root = root.map_or_else(resolve_workspace_root, Path::to_path_buf);
    emit_ok(
        output_mode,
        &json!({
            "workspace_root": root,
            "catalog": catalog_path(&root),
            "base_config": base_config_path(&root),
            "env": {
                ENV_GOVHARNESS_ROOT: std::env::var(ENV_GOVHARNESS_ROOT).ok(),
                ENV_GOVHARNESS_ENVIRONMENT: std::env::var(ENV_GOVHARNESS_ENVIRONMENT).ok(),
                ENV_GOVHARNESS_LOG_LEVEL: std::env::var(ENV_GOVHARNESS_LOG_LEVEL).ok(),
            },
        }),
    )
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

fn forced_level(flags: LogFlags) -> Option<&'static str> {
    if flags.trace {
        Some("trace")
    } else if flags.verbose > 0 {
        Some("debug")
    } else if flags.quiet {
        Some("error")
    } else {
        None
    }
}

/// Flags win over `GOVHARNESS_LOG_LEVEL`, which wins over `RUST_LOG`.
fn log_filter(flags: LogFlags) -> EnvFilter {
    if let Some(level) = forced_level(flags) {
        return EnvFilter::new(level);
    }
    match std::env::var(ENV_GOVHARNESS_LOG_LEVEL) {
        Ok(level) if !level.trim().is_empty() => EnvFilter::new(level.trim()),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

fn init_tracing(flags: LogFlags) {
    let filter = log_filter(flags);
    let installed = if flags.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
