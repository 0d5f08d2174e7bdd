//! Palette file loading and discovery
//!
//! Provides functions to find, parse and validate palette documents.

use super::schema::PaletteFile;
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names looked up during discovery, in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &["tonepal.toml", "tonepal.json", "tonepal.json5"];

/// Palette file loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse TOML palette file: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parsing error
    #[error("Failed to parse JSON palette file: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON5 parsing error
    #[error("Failed to parse JSON5 palette file: {0}")]
    Json5(#[from] json5::Error),
    /// Extension is not one of toml, json, json5
    #[error("Unsupported palette file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// No path given and discovery found nothing
    #[error("No {} found in this directory, its parents, or the user config directory", CONFIG_FILE_NAMES.join(" / "))]
    NotFound,
    /// Validation error
    #[error("Palette validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Document syntax of a palette file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFormat {
    Toml,
    Json,
    Json5,
}

impl PaletteFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("json") => Some(Self::Json),
            Some("json5") => Some(Self::Json5),
            _ => None,
        }
    }
}

/// Find a palette file by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory, checking each of [`CONFIG_FILE_NAMES`]
/// 2. Check XDG_CONFIG_HOME/tonepal/ (or ~/.config/tonepal/) the same way
pub fn find_config() -> Option<PathBuf> {
    env::current_dir()
        .ok()
        .and_then(|cwd| find_config_from(&cwd))
        .or_else(find_xdg_config)
}

/// Find a palette file in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    config_in_dir(&xdg_config.join("tonepal"))
}

/// Find a palette file in `start` or the nearest ancestor that has one.
///
/// Within one directory `tonepal.toml` is preferred over `tonepal.json`,
/// which is preferred over `tonepal.json5`.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(config_in_dir)
}

fn config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

/// Parse a palette document without validating it.
pub fn parse_palette(contents: &str, format: PaletteFormat) -> Result<PaletteFile, ConfigError> {
    let file: PaletteFile = match format {
        PaletteFormat::Toml => toml::from_str(contents)?,
        PaletteFormat::Json => serde_json::from_str(contents)?,
        PaletteFormat::Json5 => json5::from_str(contents)?,
    };
    Ok(file)
}

/// Resolve the path to load: the given one, or the discovered one.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => find_config().ok_or(ConfigError::NotFound),
    }
}

/// Read and parse a palette file without validating it.
pub fn read_palette_file(path: &Path) -> Result<PaletteFile, ConfigError> {
    let format =
        PaletteFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.into()))?;
    let contents = fs::read_to_string(path)?;
    debug!("Parsing {:?} palette file {}", format, path.display());
    parse_palette(&contents, format)
}

/// Load and validate a palette file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate a palette file.
///
/// # Example
/// ```ignore
/// let file = load_config(Some(Path::new("themes/tonepal.toml")))?;
/// let palette = create_palette(&file.entities(), &file.to_config())?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PaletteFile, ConfigError> {
    let path = resolve_path(path)?;
    let file = read_palette_file(&path)?;

    let errors = file.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(file)
}
