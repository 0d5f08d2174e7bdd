//! Palette file configuration
//!
//! Provides types and parsing for `tonepal.toml` palette documents.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
