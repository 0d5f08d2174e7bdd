//! Tonepal - derive flattened tone/subtone palettes from base color entities
//!
//! This library provides functionality to:
//! - Build tones from modifiers, optionally with a nested subtone group
//! - Flatten entities x tones x subtones into one keyed palette
//! - Describe modifiers declaratively with `{field}` templates
//! - Load palette documents from TOML, JSON or JSON5

pub mod cli;
pub mod config;
pub mod palette;
pub mod presets;
pub mod record;
pub mod template;
pub mod tone;

pub use palette::{create_palette, BuildMode, Entities, OutputMap, PaletteBuilder, PaletteConfig};
pub use record::{attributes, field, AttributeRecord, ModifierError, OrderedMap};
pub use tone::{create_tone, Modifier, SubtoneGroup, Tone};
