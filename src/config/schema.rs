//! Palette file schema
//!
//! Defines the structure and validation rules for palette documents
//! (`tonepal.toml`, or the equivalent JSON / JSON5 document).
//!
//! ```toml
//! [palette]
//! name = "demo"
//! entities = "@primaries"
//!
//! [base]
//! background = "{main}"
//!
//! [tones.depths]
//! name = "depth"
//! fields = { foreground = "{main}" }
//! subtones."8-bit" = { borderColor = "{main}" }
//! ```
//!
//! Every table that feeds the builder keeps document order.

use serde::{Deserialize, Serialize};

use crate::palette::{is_valid_segment, BuildMode, Entities, PaletteConfig, SEPARATOR};
use crate::presets::get_preset;
use crate::record::OrderedMap;
use crate::template::RecordTemplate;
use crate::tone::{create_tone, Modifier, SubtoneGroup, Tone};

/// Raw template table: output field to template value.
pub type TemplateTable = OrderedMap<String>;

/// Palette metadata section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteSection {
    /// Display name of the palette
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Preset entity set (`@name`) loaded before inline entities
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entities: Option<String>,
}

/// One tone: its own fields plus named subtones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToneDef {
    /// Subtone group name used in output keys (defaults to the tone key)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Fields produced by the tone itself
    #[serde(default)]
    pub fields: TemplateTable,
    /// Subtones in evaluation order
    #[serde(default)]
    pub subtones: OrderedMap<TemplateTable>,
}

impl ToneDef {
    /// Name of the subtone group for a tone declared under `key`.
    pub fn group_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }
}

/// Build settings section
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Collision handling (`lenient` or `strict`)
    #[serde(default)]
    pub mode: BuildMode,
    /// Compute entities in parallel
    #[serde(default)]
    pub parallel: bool,
}

/// A complete palette document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteFile {
    #[serde(default)]
    pub palette: PaletteSection,
    /// Inline entities, merged over the preset
    #[serde(default)]
    pub entities: Entities,
    /// Base template merged into every entity's own record
    #[serde(default)]
    pub base: TemplateTable,
    #[serde(default)]
    pub tones: OrderedMap<ToneDef>,
    #[serde(default)]
    pub build: BuildSection,
}

/// Validation error for palette files
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "tones.brightness.subtones.low")
    pub field: String,
    /// Error message
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.message)
    }
}

impl PaletteFile {
    /// Validate the document and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let strict = self.build.mode == BuildMode::Strict;

        let check_name = |errors: &mut Vec<ConfigValidationError>, path: String, name: &str| {
            if name.is_empty() {
                errors.push(ConfigValidationError::new(path, "must be a non-empty name"));
            } else if strict && !is_valid_segment(name) {
                errors.push(ConfigValidationError::new(
                    path,
                    format!("must not contain '{}' in strict mode", SEPARATOR),
                ));
            }
        };

        if let Some(preset) = &self.palette.entities {
            if get_preset(preset).is_none() {
                errors.push(ConfigValidationError::new(
                    "palette.entities",
                    format!("unknown preset '{}'", preset),
                ));
            }
        }

        if self.palette.entities.is_none() && self.entities.is_empty() {
            errors.push(ConfigValidationError::new(
                "entities",
                "must define at least one entity or reference a preset",
            ));
        }

        for name in self.entities.keys() {
            check_name(&mut errors, format!("entities.{}", name), name);
        }

        check_template(&mut errors, "base", &self.base);

        for (key, tone) in self.tones.iter() {
            check_name(&mut errors, format!("tones.{}.name", key), tone.group_name(key));
            check_template(&mut errors, &format!("tones.{}.fields", key), &tone.fields);

            for (sub, table) in tone.subtones.iter() {
                let path = format!("tones.{}.subtones.{}", key, sub);
                check_name(&mut errors, path.clone(), sub);
                check_template(&mut errors, &path, table);
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Preset entities (if any) with inline entities merged over them.
    ///
    /// An inline entity that shares a preset entity's name extends and
    /// overrides that entity's fields. Unknown presets contribute nothing.
    pub fn entities(&self) -> Entities {
        let mut entities = self.palette.entities.as_deref().and_then(get_preset).unwrap_or_default();

        for (name, record) in self.entities.iter() {
            let mut merged = entities.get(name).cloned().unwrap_or_default();
            merged.extend(record.iter().map(|(k, v)| (k.clone(), v.clone())));
            entities.insert(name, merged);
        }

        entities
    }

    /// Compile the base and tone templates into a builder config.
    pub fn to_config(&self) -> PaletteConfig {
        let (base, _) = Modifier::from_template(&self.base);

        let tones: OrderedMap<Tone> = self
            .tones
            .iter()
            .map(|(key, def)| {
                let (modifier, _) = Modifier::from_template(&def.fields);
                let subtones: OrderedMap<Modifier> = def
                    .subtones
                    .iter()
                    .map(|(sub, table)| (sub, Modifier::from_template(table).0))
                    .collect();
                let group = SubtoneGroup::from_subtones(def.group_name(key), subtones);
                (key, create_tone(modifier, Some(group)))
            })
            .collect();

        PaletteConfig::with_tones(base, tones)
    }
}

fn check_template(errors: &mut Vec<ConfigValidationError>, path: &str, table: &TemplateTable) {
    let (_, warnings) = RecordTemplate::parse(table);
    errors.extend(warnings.into_iter().map(|w| ConfigValidationError::new(path, w.message)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::attributes;

    const DEMO: &str = r##"
[palette]
name = "demo"

[entities.red]
main = "red"
light = "lightred"

[base]
background = "{main}"

[tones.brightness]
fields = { foreground = "{main}", customProp = "#f0f0f0" }

[tones.brightness.subtones]
low = { white = "{light}" }
medium = { shadow = "{main}" }

[tones.depths]
name = "depth"
fields = { color = "{light}" }
"##;

    #[test]
    fn test_parse_and_order() {
        let file: PaletteFile = toml::from_str(DEMO).unwrap();
        assert_eq!(file.palette.name.as_deref(), Some("demo"));
        assert_eq!(file.tones.keys().collect::<Vec<_>>(), vec!["brightness", "depths"]);
        assert_eq!(
            file.tones["brightness"].subtones.keys().collect::<Vec<_>>(),
            vec!["low", "medium"]
        );
        assert_eq!(file.build.mode, BuildMode::Lenient);
        assert!(file.is_valid(), "{:?}", file.validate());
    }

    #[test]
    fn test_group_name_defaults_to_key() {
        let file: PaletteFile = toml::from_str(DEMO).unwrap();
        assert_eq!(file.tones["brightness"].group_name("brightness"), "brightness");
        assert_eq!(file.tones["depths"].group_name("depths"), "depth");
    }

    #[test]
    fn test_to_config() {
        let file: PaletteFile = toml::from_str(DEMO).unwrap();
        let config = file.to_config();
        let depths = &config.tones()["depths"];
        assert_eq!(depths.name(), Some("depth"));
        assert!(depths.subtones().unwrap().is_empty());

        let red = attributes([("main", "red"), ("light", "lightred")]);
        assert_eq!(config.base().apply(&red).unwrap(), attributes([("background", "red")]));
        let low = config.tones()["brightness"].subtones().unwrap().subtone("low").unwrap();
        assert_eq!(low.apply(&red).unwrap(), attributes([("white", "lightred")]));
    }

    #[test]
    fn test_entities_merge_over_preset() {
        let file: PaletteFile = toml::from_str(
            r##"
[palette]
entities = "@primaries"

[entities.red]
main = "#ff0000"

[entities.purple]
main = "purple"
"##,
        )
        .unwrap();

        let entities = file.entities();
        assert_eq!(
            entities.keys().collect::<Vec<_>>(),
            vec!["red", "green", "blue", "yellow", "purple"]
        );
        assert_eq!(entities["red"]["main"], "#ff0000");
        assert_eq!(entities["red"]["dark"], "darkred");
        assert_eq!(entities["purple"], attributes([("main", "purple")]));
    }

    #[test]
    fn test_validate_unknown_preset_and_empty() {
        let file: PaletteFile = toml::from_str("[palette]\nentities = \"@nope\"\n").unwrap();
        let errors = file.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "palette.entities");

        let empty = PaletteFile::default();
        let errors = empty.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "entities");
    }

    #[test]
    fn test_validate_template_warnings() {
        let file: PaletteFile = toml::from_str(
            r#"
[entities.red]
main = "red"

[base]
background = "{main"
"#,
        )
        .unwrap();
        let errors = file.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "base");
        assert!(errors[0].to_string().contains("Unclosed"));
    }

    #[test]
    fn test_validate_separator_only_in_strict_mode() {
        let doc = r#"
[entities.dark_red]
main = "red"
"#;
        let lenient: PaletteFile = toml::from_str(doc).unwrap();
        assert!(lenient.is_valid());

        let strict: PaletteFile = toml::from_str(&format!("{doc}\n[build]\nmode = \"strict\"\n")).unwrap();
        let errors = strict.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "entities.dark_red");
    }

    #[test]
    fn test_json_document() {
        let file: PaletteFile = serde_json::from_str(
            r#"{
                "entities": { "blue": { "main": "blue" } },
                "base": { "color": "{main}" },
                "tones": { "glow": { "fields": { "halo": "{main}" } } },
                "build": { "mode": "strict", "parallel": true }
            }"#,
        )
        .unwrap();
        assert_eq!(file.build.mode, BuildMode::Strict);
        assert!(file.build.parallel);
        assert!(file.is_valid());
    }
}
