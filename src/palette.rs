//! Palette building.
//!
//! Walks every entity through the base modifier and every tone/subtone of a
//! [`PaletteConfig`], producing one flat [`OutputMap`]:
//!
//! - `entity` holds the raw fields merged with the base modifier's output
//!   (modifier fields win)
//! - `entity_<group>` holds a tone's output, where `<group>` is the name of
//!   the tone's subtone group
//! - `entity_<subtone>_<group>` holds each subtone's output
//!
//! Tone and subtone entries contain only what their modifier returned.
//! Entries are produced in entity order, then tone order, then subtone order.
//! When two entries share a key the later one wins; [`BuildMode::Strict`]
//! turns that into an error instead.

use log::debug;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::record::{AttributeRecord, ModifierError, OrderedMap};
use crate::tone::{Modifier, SubtoneGroup, Tone};

/// Separator between composite key segments.
pub const SEPARATOR: char = '_';

/// Entities keyed by name, in caller order.
pub type Entities = OrderedMap<AttributeRecord>;

/// The flattened palette: composite key to derived record.
pub type OutputMap = OrderedMap<AttributeRecord>;

/// Which part of a composite key a name is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Entity,
    Group,
    Subtone,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Entity => write!(f, "entity"),
            SegmentKind::Group => write!(f, "subtone group"),
            SegmentKind::Subtone => write!(f, "subtone"),
        }
    }
}

/// Error when building a palette.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// A modifier failed while computing the entry for `key`
    #[error("Failed to compute '{key}': {source}")]
    Modifier {
        key: String,
        #[source]
        source: ModifierError,
    },
    /// Two entries produced the same key (strict mode)
    #[error("Key '{key}' is produced more than once")]
    KeyCollision { key: String },
    /// A name cannot be used as a key segment (strict mode)
    #[error("Invalid {kind} name '{name}': must be non-empty and must not contain '{sep}'", sep = SEPARATOR)]
    InvalidSegment { kind: SegmentKind, name: String },
    /// A tone without a subtone group was listed among the tones
    #[error("Tone '{tone}' has no subtone group")]
    UngroupedTone { tone: String },
}

/// How the builder treats collisions and malformed names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Later entries overwrite earlier ones; collisions become warnings
    #[default]
    Lenient,
    /// Collisions and invalid names are errors
    Strict,
}

/// Warning emitted when a later entry overwrote an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionWarning {
    pub key: String,
    pub entity: String,
}

impl fmt::Display for CollisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key '{}' overwritten while processing entity '{}'", self.key, self.entity)
    }
}

/// Base modifier plus named tones.
#[derive(Debug, Clone)]
pub struct PaletteConfig {
    base: Modifier,
    tones: OrderedMap<Tone>,
}

impl PaletteConfig {
    pub fn new(base: impl Into<Modifier>) -> Self {
        Self { base: base.into(), tones: OrderedMap::new() }
    }

    pub fn with_tones(base: impl Into<Modifier>, tones: OrderedMap<Tone>) -> Self {
        Self { base: base.into(), tones }
    }

    /// Add a tone. Tones are processed in the order they are added.
    pub fn with_tone(mut self, key: impl Into<String>, tone: Tone) -> Self {
        self.tones.insert(key, tone);
        self
    }

    pub fn base(&self) -> &Modifier {
        &self.base
    }

    pub fn tones(&self) -> &OrderedMap<Tone> {
        &self.tones
    }
}

impl From<Tone> for Modifier {
    /// Use a tone as a plain modifier. Any subtone group is dropped.
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Base(modifier) => modifier,
            Tone::Grouped { modifier, .. } => modifier,
        }
    }
}

/// Result of a build: the palette and any collision warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub palette: OutputMap,
    pub warnings: Vec<CollisionWarning>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Key of a tone-level entry.
pub fn tone_key(entity: &str, group: &str) -> String {
    format!("{entity}{SEPARATOR}{group}")
}

/// Key of a subtone-level entry.
pub fn subtone_key(entity: &str, subtone: &str, group: &str) -> String {
    format!("{entity}{SEPARATOR}{subtone}{SEPARATOR}{group}")
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| Regex::new(r"^[^_]+$").expect("segment pattern is valid"))
}

/// Check whether a name can be used as one composite key segment.
pub fn is_valid_segment(name: &str) -> bool {
    segment_regex().is_match(name)
}

fn check_segment(kind: SegmentKind, name: &str) -> Result<(), PaletteError> {
    if is_valid_segment(name) {
        Ok(())
    } else {
        Err(PaletteError::InvalidSegment { kind, name: name.to_string() })
    }
}

/// The subtone group of every tone, in tone order.
///
/// Every tone key is built from a group name, so a tone without one fails.
fn tone_groups(config: &PaletteConfig) -> Result<Vec<(&Tone, &SubtoneGroup)>, PaletteError> {
    config
        .tones()
        .iter()
        .map(|(tone_name, tone)| {
            tone.subtones()
                .map(|group| (tone, group))
                .ok_or_else(|| PaletteError::UngroupedTone { tone: tone_name.to_string() })
        })
        .collect()
}

/// All keys a build would produce, in output order, without running any modifier.
///
/// Keys produced more than once are listed once, at their first position.
pub fn expected_keys(
    entities: &Entities,
    config: &PaletteConfig,
) -> Result<Vec<String>, PaletteError> {
    let groups = tone_groups(config)?;
    let mut keys = OrderedMap::new();
    for name in entities.keys() {
        keys.insert(name, ());
        for &(_, group) in &groups {
            keys.insert(tone_key(name, group.name()), ());
            for sub in group.subtones().keys() {
                keys.insert(subtone_key(name, sub, group.name()), ());
            }
        }
    }
    Ok(keys.into_iter().map(|(k, _)| k).collect())
}

/// Builds palettes from a config.
///
/// # Example
///
/// ```
/// use tonepal::palette::{BuildMode, Entities, PaletteBuilder, PaletteConfig};
/// use tonepal::record::{attributes, field};
/// use tonepal::tone::Modifier;
///
/// let config = PaletteConfig::new(Modifier::new(|c| {
///     Ok(attributes([("background", field(c, "main")?)]))
/// }));
/// let entities: Entities = [("red", attributes([("main", "red")]))].into_iter().collect();
///
/// let report = PaletteBuilder::new(&config).with_mode(BuildMode::Strict).build(&entities).unwrap();
/// assert_eq!(report.palette["red"]["background"], "red");
/// ```
#[derive(Debug, Clone)]
pub struct PaletteBuilder<'a> {
    config: &'a PaletteConfig,
    mode: BuildMode,
    parallel: bool,
}

impl<'a> PaletteBuilder<'a> {
    pub fn new(config: &'a PaletteConfig) -> Self {
        Self { config, mode: BuildMode::Lenient, parallel: false }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Compute entities on the rayon pool. Output is identical to a sequential build.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Build the palette for `entities`.
    pub fn build(&self, entities: &Entities) -> Result<BuildReport, PaletteError> {
        debug!(
            "Building palette: {} entities, {} tones ({:?}{})",
            entities.len(),
            self.config.tones().len(),
            self.mode,
            if self.parallel { ", parallel" } else { "" }
        );

        let groups = tone_groups(self.config)?;
        if self.mode == BuildMode::Strict {
            self.check_names(entities, &groups)?;
        }

        let fragments = if self.parallel {
            let items: Vec<(&str, &AttributeRecord)> = entities.iter().collect();
            items
                .par_iter()
                .map(|&(name, record)| self.entity_entries(name, record, &groups))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            entities
                .iter()
                .map(|(name, record)| self.entity_entries(name, record, &groups))
                .collect::<Result<Vec<_>, _>>()?
        };

        // Merge in entity order so collisions resolve the same way either path.
        let mut report = BuildReport { palette: OutputMap::new(), warnings: Vec::new() };
        for ((entity, _), entries) in entities.iter().zip(fragments) {
            for (key, record) in entries {
                if report.palette.insert(key.clone(), record).is_some() {
                    if self.mode == BuildMode::Strict {
                        return Err(PaletteError::KeyCollision { key });
                    }
                    let warning = CollisionWarning { key, entity: entity.to_string() };
                    debug!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }

        debug!("Built palette with {} entries", report.palette.len());
        Ok(report)
    }

    fn check_names(
        &self,
        entities: &Entities,
        groups: &[(&Tone, &SubtoneGroup)],
    ) -> Result<(), PaletteError> {
        for name in entities.keys() {
            check_segment(SegmentKind::Entity, name)?;
        }
        for &(_, group) in groups {
            check_segment(SegmentKind::Group, group.name())?;
            for sub in group.subtones().keys() {
                check_segment(SegmentKind::Subtone, sub)?;
            }
        }
        Ok(())
    }

    /// Entries for one entity, in processing order.
    fn entity_entries(
        &self,
        name: &str,
        record: &AttributeRecord,
        groups: &[(&Tone, &SubtoneGroup)],
    ) -> Result<Vec<(String, AttributeRecord)>, PaletteError> {
        let compute = |key: &str, modifier: &Modifier| {
            modifier
                .apply(record)
                .map_err(|source| PaletteError::Modifier { key: key.to_string(), source })
        };

        let mut entries = Vec::new();

        let mut base = record.clone();
        base.extend(compute(name, self.config.base())?);
        entries.push((name.to_string(), base));

        for &(tone, group) in groups {
            let key = tone_key(name, group.name());
            let value = compute(&key, tone.modifier())?;
            entries.push((key, value));

            for (sub, modifier) in group.subtones().iter() {
                let key = subtone_key(name, sub, group.name());
                let value = compute(&key, modifier)?;
                entries.push((key, value));
            }
        }

        Ok(entries)
    }
}

/// Build a palette in lenient mode: later entries overwrite earlier ones.
pub fn create_palette(
    entities: &Entities,
    config: &PaletteConfig,
) -> Result<OutputMap, PaletteError> {
    PaletteBuilder::new(config).build(entities).map(|report| report.palette)
}
