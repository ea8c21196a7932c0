//! Binary entry point for jobsplit.
//!
//! This binary provides the CLI interface for the JOB record file splitter.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use jobsplit::SplitterConfig;
use jobsplit::cli::{self, InputArgs, OutputFormat};
use jobsplit::config::paths;
use jobsplit::observability::{self, InitOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Jobsplit - splits JOB record files into fixed-size chunks.
#[derive(Parser)]
#[command(name = "jobsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = paths::CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Split the input file into chunks.
    Split {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate the input file and show the planned chunks.
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (text or json).
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: SplitterConfig) -> jobsplit::Result<()> {
    match command {
        Commands::Split { input } => cli::cmd_split(input.apply(config)).map(|_| ()),
        Commands::Check { input, format } => {
            cli::cmd_check(input.apply(config), format).map(|_| ())
        },
        Commands::Config { show } => cli::cmd_config(&config, show),
    }
}

/// Loads configuration.
fn load_config(path: Option<&Path>) -> jobsplit::Result<SplitterConfig> {
    // `--config` or `JOBSPLIT_CONFIG_PATH` wins over every default location
    if let Some(config_path) = path {
        return SplitterConfig::load_from_file(config_path, paths::resolve_app_dir());
    }

    SplitterConfig::load_default()
}
