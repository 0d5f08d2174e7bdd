//! Build and keys command implementations

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_config;
use crate::palette::{expected_keys, BuildMode, PaletteBuilder};

use super::{report_config_error, EXIT_ERROR, EXIT_SUCCESS};

/// Flags of the build command
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFlags {
    pub strict: bool,
    pub parallel: bool,
    pub compact: bool,
}

/// Execute the build command
pub fn run_build(input: Option<&Path>, output: Option<&Path>, flags: BuildFlags) -> ExitCode {
    let file = match load_config(input) {
        Ok(file) => file,
        Err(e) => return report_config_error(&e),
    };

    let mode = if flags.strict { BuildMode::Strict } else { file.build.mode };
    let config = file.to_config();
    let entities = file.entities();

    let report = match PaletteBuilder::new(&config)
        .with_mode(mode)
        .with_parallel(flags.parallel || file.build.parallel)
        .build(&entities)
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // The builder only logs collisions at debug level; surface them here.
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    let json = if flags.compact {
        serde_json::to_string(&report.palette)
    } else {
        serde_json::to_string_pretty(&report.palette)
    };
    let json = match json {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: Failed to serialize palette: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, json + "\n") {
                eprintln!("Error: Failed to write '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Saved: {} ({} entries)", path.display(), report.palette.len());
        }
        None => println!("{}", json),
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the keys command
pub fn run_keys(input: Option<&Path>) -> ExitCode {
    let file = match load_config(input) {
        Ok(file) => file,
        Err(e) => return report_config_error(&e),
    };

    match expected_keys(&file.entities(), &file.to_config()) {
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
