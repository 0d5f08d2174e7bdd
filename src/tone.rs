//! Tone construction.
//!
//! A [`Modifier`] derives a new [`AttributeRecord`] from an entity's raw
//! fields. A [`Tone`] is a modifier that may carry one [`SubtoneGroup`]: a
//! named set of further modifiers evaluated against the same input record.
//!
//! # Example
//!
//! ```
//! use tonepal::record::{attributes, field};
//! use tonepal::tone::{create_tone, Modifier, SubtoneGroup};
//!
//! let brightness = create_tone(
//!     Modifier::new(|c| Ok(attributes([("foreground", field(c, "main")?)]))),
//!     Some(SubtoneGroup::new("brightness").with_subtone(
//!         "low",
//!         Modifier::new(|c| Ok(attributes([("white", field(c, "light")?)]))),
//!     )),
//! );
//!
//! let color = attributes([("main", "#777"), ("light", "#fff")]);
//! assert_eq!(brightness.name(), Some("brightness"));
//! assert_eq!(brightness.apply(&color).unwrap()["foreground"], "#777");
//!
//! let low = brightness.subtones().and_then(|g| g.subtone("low")).unwrap();
//! assert_eq!(low.apply(&color).unwrap()["white"], "#fff");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::record::{AttributeRecord, ModifierError, OrderedMap};

/// Signature of a modifier function.
pub type ModifierFn =
    dyn Fn(&AttributeRecord) -> Result<AttributeRecord, ModifierError> + Send + Sync;

/// A pure, shareable record transform.
///
/// Cloning a modifier is cheap and shares the underlying function.
#[derive(Clone)]
pub struct Modifier(Arc<ModifierFn>);

impl Modifier {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&AttributeRecord) -> Result<AttributeRecord, ModifierError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate the modifier against a record.
    pub fn apply(&self, record: &AttributeRecord) -> Result<AttributeRecord, ModifierError> {
        (self.0)(record)
    }

    /// True when both handles share the same function.
    pub fn ptr_eq(&self, other: &Modifier) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Modifier(..)")
    }
}

/// A named group of subtone modifiers nested under one tone.
#[derive(Debug, Clone)]
pub struct SubtoneGroup {
    name: String,
    subtones: OrderedMap<Modifier>,
}

impl SubtoneGroup {
    /// Create an empty group. Subtones are evaluated in the order they are added.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), subtones: OrderedMap::new() }
    }

    /// Create a group from an already ordered set of subtones.
    pub fn from_subtones(name: impl Into<String>, subtones: OrderedMap<Modifier>) -> Self {
        Self { name: name.into(), subtones }
    }

    pub fn with_subtone(mut self, name: impl Into<String>, modifier: Modifier) -> Self {
        self.subtones.insert(name, modifier);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subtones(&self) -> &OrderedMap<Modifier> {
        &self.subtones
    }

    pub fn subtone(&self, name: &str) -> Option<&Modifier> {
        self.subtones.get(name)
    }

    pub fn len(&self) -> usize {
        self.subtones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtones.is_empty()
    }
}

/// A tone: either a bare modifier, or a modifier paired with a subtone group.
#[derive(Debug, Clone)]
pub enum Tone {
    /// Plain transform with no nested group (used as the palette base)
    Base(Modifier),
    /// Transform with one attached subtone group
    Grouped { modifier: Modifier, group: SubtoneGroup },
}

impl Tone {
    /// Evaluate the tone's own modifier. Subtones are not evaluated.
    pub fn apply(&self, record: &AttributeRecord) -> Result<AttributeRecord, ModifierError> {
        self.modifier().apply(record)
    }

    pub fn modifier(&self) -> &Modifier {
        match self {
            Tone::Base(modifier) => modifier,
            Tone::Grouped { modifier, .. } => modifier,
        }
    }

    /// The attached subtone group, if any.
    pub fn subtones(&self) -> Option<&SubtoneGroup> {
        match self {
            Tone::Base(_) => None,
            Tone::Grouped { group, .. } => Some(group),
        }
    }

    /// Name of the attached subtone group.
    pub fn name(&self) -> Option<&str> {
        self.subtones().map(SubtoneGroup::name)
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, Tone::Grouped { .. })
    }
}

impl From<Modifier> for Tone {
    fn from(modifier: Modifier) -> Self {
        Tone::Base(modifier)
    }
}

/// Build a tone from a modifier and an optional subtone group.
pub fn create_tone(modifier: Modifier, subtone_group: Option<SubtoneGroup>) -> Tone {
    match subtone_group {
        Some(group) => Tone::Grouped { modifier, group },
        None => Tone::Base(modifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{attributes, field};

    fn sample() -> AttributeRecord {
        attributes([("main", "#777"), ("light", "#fff"), ("dark", "#000"), ("extra", "#111")])
    }

    fn base_colors() -> Tone {
        create_tone(
            Modifier::new(|c| {
                Ok(attributes([("background", field(c, "main")?), ("color", field(c, "main")?)]))
            }),
            None,
        )
    }

    fn depths() -> Tone {
        create_tone(
            Modifier::new(|c| {
                Ok(attributes([
                    ("background", field(c, "light")?),
                    ("foreground", field(c, "main")?),
                    ("color", field(c, "extra")?),
                ]))
            }),
            Some(
                SubtoneGroup::new("depth")
                    .with_subtone(
                        "8-bit",
                        Modifier::new(|c| Ok(attributes([("borderColor", field(c, "main")?)]))),
                    )
                    .with_subtone(
                        "16-bit",
                        Modifier::new(|c| {
                            Ok(attributes([
                                ("borderColor", field(c, "main")?),
                                ("anotherColor", field(c, "light")?),
                            ]))
                        }),
                    )
                    .with_subtone(
                        "24-bit",
                        Modifier::new(|c| Ok(attributes([("extraColor", field(c, "extra")?)]))),
                    ),
            ),
        )
    }

    #[test]
    fn test_base_tone_has_no_group() {
        let base = base_colors();
        assert!(!base.is_grouped());
        assert!(base.subtones().is_none());
        assert_eq!(base.name(), None);
        assert_eq!(
            base.apply(&sample()).unwrap(),
            attributes([("background", "#777"), ("color", "#777")])
        );
    }

    #[test]
    fn test_grouped_tone_name_check() {
        assert_eq!(depths().name(), Some("depth"));
    }

    #[test]
    fn test_grouped_tone_applies_own_modifier_only() {
        let out = depths().apply(&sample()).unwrap();
        assert_eq!(
            out,
            attributes([("background", "#fff"), ("foreground", "#777"), ("color", "#111")])
        );
    }

    #[test]
    fn test_subtones_callable_independently() {
        let tone = depths();
        let group = tone.subtones().unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(
            group.subtone("16-bit").unwrap().apply(&sample()).unwrap(),
            attributes([("borderColor", "#777"), ("anotherColor", "#fff")])
        );
        assert_eq!(
            group.subtone("24-bit").unwrap().apply(&sample()).unwrap(),
            attributes([("extraColor", "#111")])
        );
        assert!(group.subtone("32-bit").is_none());
    }

    #[test]
    fn test_subtone_order_follows_insertion() {
        let tone = depths();
        let names: Vec<_> = tone.subtones().unwrap().subtones().keys().collect();
        assert_eq!(names, vec!["8-bit", "16-bit", "24-bit"]);
    }

    #[test]
    fn test_group_read_is_stable() {
        let tone = depths();
        let first = tone.subtones().unwrap().subtone("8-bit").unwrap();
        let second = tone.subtones().unwrap().subtone("8-bit").unwrap();
        assert!(first.ptr_eq(second));
        assert!(std::ptr::eq(tone.subtones().unwrap(), tone.subtones().unwrap()));
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let input = sample();
        let before = input.clone();
        let _ = depths().apply(&input).unwrap();
        assert_eq!(input, before);
    }

    #[test]
    fn test_missing_field_surfaces() {
        let partial = attributes([("main", "#777")]);
        let err = depths().apply(&partial).unwrap_err();
        assert_eq!(err, ModifierError::missing("light"));
    }

    #[test]
    fn test_from_modifier_is_base() {
        let tone: Tone = Modifier::new(|_| Ok(AttributeRecord::new())).into();
        assert!(matches!(tone, Tone::Base(_)));
    }
}
