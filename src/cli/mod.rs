//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod check;
mod presets;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::ConfigError;

pub use presets::PresetAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Tonepal - Derive flattened tone/subtone palettes from base colors
#[derive(Parser)]
#[command(name = "tonepal")]
#[command(about = "Tonepal - Derive flattened tone/subtone palettes from base colors")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the palette and print it as JSON
    Build {
        /// Palette file (.toml, .json, .json5). Discovers tonepal.toml/.json/.json5 if omitted
        input: Option<PathBuf>,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strict mode: key collisions and invalid names are errors
        #[arg(long)]
        strict: bool,

        /// Compute entities in parallel
        #[arg(long)]
        parallel: bool,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List the keys the palette would contain, in output order
    Keys {
        /// Palette file (.toml, .json, .json5). Discovers tonepal.toml/.json/.json5 if omitted
        input: Option<PathBuf>,
    },

    /// Validate a palette file without building it
    Check {
        /// Palette file (.toml, .json, .json5). Discovers tonepal.toml/.json/.json5 if omitted
        input: Option<PathBuf>,
    },

    /// List or show built-in entity presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
}

/// Initialize env_logger. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // A logger may already be installed when run from tests.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Print a config error and pick its exit code.
pub(crate) fn report_config_error(err: &ConfigError) -> ExitCode {
    eprintln!("Error: {}", err);
    match err {
        ConfigError::Validation(_) | ConfigError::UnsupportedFormat(_) | ConfigError::NotFound => {
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { input, output, strict, parallel, compact } => build::run_build(
            input.as_deref(),
            output.as_deref(),
            build::BuildFlags { strict, parallel, compact },
        ),
        Commands::Keys { input } => build::run_keys(input.as_deref()),
        Commands::Check { input } => check::run_check(input.as_deref()),
        Commands::Presets { action } => presets::run_presets(action),
    }
}
