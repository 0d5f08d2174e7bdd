//! Presets command implementation

use clap::Subcommand;
use std::process::ExitCode;

use crate::presets::{get_preset, list_presets, PRESET_FIELDS};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List all available presets
    List,
    /// Show the entities of a specific preset
    Show {
        /// Name of the preset to show
        name: String,
    },
}

/// Execute the presets command
pub fn run_presets(action: PresetAction) -> ExitCode {
    match action {
        PresetAction::List => {
            println!("Built-in presets:");
            for name in list_presets() {
                println!("  @{}", name);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PresetAction::Show { name } => {
            let preset_name = name.strip_prefix('@').unwrap_or(&name);
            match get_preset(preset_name) {
                Some(entities) => {
                    println!("Preset: @{}", preset_name);
                    println!();
                    for (entity, record) in entities.iter() {
                        println!("  {}", entity);
                        for field in PRESET_FIELDS {
                            if let Some(value) = record.get(*field) {
                                println!("    {} => {}", field, value);
                            }
                        }
                    }
                    ExitCode::from(EXIT_SUCCESS)
                }
                None => {
                    eprintln!("Error: Unknown preset '{}'", name);
                    eprintln!();
                    eprintln!("Available presets:");
                    for name in list_presets() {
                        eprintln!("  @{}", name);
                    }
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
    }
}
