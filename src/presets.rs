//! Built-in entity sets.
//!
//! Provides a few ready-made entity sets that palette files can reference by
//! name using the `@name` syntax. Every preset entity carries the same four
//! fields: `main`, `dark`, `light` and `extra`.

use crate::palette::Entities;
use crate::record::attributes;

/// List of all available preset names.
const PRESET_NAMES: &[&str] = &["primaries", "mono", "gameboy"];

/// Fields every preset entity defines.
pub const PRESET_FIELDS: &[&str] = &["main", "dark", "light", "extra"];

/// Returns a list of all available preset names.
pub fn list_presets() -> Vec<&'static str> {
    PRESET_NAMES.to_vec()
}

/// Returns a preset by name, or None if not found.
///
/// A leading `@` is accepted and ignored.
pub fn get_preset(name: &str) -> Option<Entities> {
    match name.strip_prefix('@').unwrap_or(name) {
        "primaries" => Some(primaries()),
        "mono" => Some(mono()),
        "gameboy" => Some(gameboy()),
        _ => None,
    }
}

fn entity(main: &str, dark: &str, light: &str, extra: &str) -> crate::record::AttributeRecord {
    attributes([("main", main), ("dark", dark), ("light", light), ("extra", extra)])
}

/// Red, green, blue and yellow with word-valued shades.
fn primaries() -> Entities {
    ["red", "green", "blue", "yellow"]
        .into_iter()
        .map(|c| {
            let rec = entity(
                c,
                &format!("dark{c}"),
                &format!("light{c}"),
                &format!("extra{c}"),
            );
            (c, rec)
        })
        .collect()
}

/// Black and white.
fn mono() -> Entities {
    Entities::new()
        .with("black", entity("#000000", "#000000", "#3F3F3F", "#1F1F1F"))
        .with("white", entity("#FFFFFF", "#BFBFBF", "#FFFFFF", "#DFDFDF"))
}

/// Game Boy 4-shade green as a single entity.
/// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
fn gameboy() -> Entities {
    Entities::new().with("green", entity("#8BAC0F", "#306230", "#9BBC0F", "#0F380F"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_presets() {
        let presets = list_presets();
        assert!(presets.contains(&"primaries"));
        assert!(presets.contains(&"mono"));
        assert!(presets.contains(&"gameboy"));
        assert_eq!(presets.len(), 3);
    }

    #[test]
    fn test_get_preset_primaries() {
        let set = get_preset("primaries").expect("primaries preset should exist");
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["red", "green", "blue", "yellow"]);
        assert_eq!(set["red"].get("dark"), Some(&"darkred".to_string()));
        assert_eq!(set["yellow"].get("extra"), Some(&"extrayellow".to_string()));
    }

    #[test]
    fn test_get_preset_with_at_prefix() {
        assert_eq!(get_preset("@mono"), get_preset("mono"));
        assert!(get_preset("@mono").is_some());
    }

    #[test]
    fn test_get_preset_nonexistent() {
        assert!(get_preset("nonexistent").is_none());
        assert!(get_preset("").is_none());
        assert!(get_preset("Mono").is_none()); // case-sensitive
    }

    #[test]
    fn test_all_presets_have_standard_fields() {
        for name in list_presets() {
            let set = get_preset(name).expect("all listed presets should exist");
            for (entity, record) in set.iter() {
                for field in PRESET_FIELDS {
                    assert!(
                        record.contains_key(*field),
                        "Preset {} entity {} should define '{}'",
                        name,
                        entity,
                        field
                    );
                }
            }
        }
    }
}
