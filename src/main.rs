//! Tonepal - Command-line tool for building tone palettes from palette files

use std::process::ExitCode;

use tonepal::cli;

fn main() -> ExitCode {
    cli::run()
}
