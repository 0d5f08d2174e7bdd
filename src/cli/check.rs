//! Check command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::{read_palette_file, resolve_path};
use crate::palette::expected_keys;

use super::{report_config_error, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the check command
pub fn run_check(input: Option<&Path>) -> ExitCode {
    let path = match resolve_path(input) {
        Ok(path) => path,
        Err(e) => return report_config_error(&e),
    };
    let file = match read_palette_file(&path) {
        Ok(file) => file,
        Err(e) => return report_config_error(&e),
    };

    let errors = file.validate();
    if !errors.is_empty() {
        eprintln!("{}: {} problem(s)", path.display(), errors.len());
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let entities = file.entities();
    let keys = match expected_keys(&entities, &file.to_config()) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    println!(
        "{}: OK ({} entities, {} tones, {} keys)",
        path.display(),
        entities.len(),
        file.tones.len(),
        keys.len()
    );
    ExitCode::from(EXIT_SUCCESS)
}
