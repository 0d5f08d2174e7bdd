//! Declarative record templates.
//!
//! A template maps output field names to strings containing `{field}`
//! placeholders, e.g. `{ foreground = "{main}", border = "1px solid {dark}" }`.
//! Rendering a template against a record substitutes each placeholder with
//! the record's value, which makes a template usable as a [`Modifier`].

use crate::record::{AttributeRecord, ModifierError, OrderedMap};
use crate::tone::Modifier;

/// A warning generated while tokenizing a template value
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// One piece of a template value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as-is
    Literal(String),
    /// `{name}` placeholder replaced by the record's `name` field
    Field(String),
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

/// Splits a template value into literal text and `{field}` placeholders.
///
/// Placeholder names can contain any characters except `}`. An unclosed or
/// empty placeholder generates a warning and is kept as literal text.
///
/// # Examples
///
/// ```
/// use tonepal::template::{tokenize_template, Segment};
///
/// let (segments, warnings) = tokenize_template("1px solid {dark}");
/// assert_eq!(
///     segments,
///     vec![Segment::Literal("1px solid ".into()), Segment::Field("dark".into())]
/// );
/// assert!(warnings.is_empty());
///
/// let (_, warnings) = tokenize_template("{main");
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn tokenize_template(value: &str) -> (Vec<Segment>, Vec<Warning>) {
    let mut segments = Vec::new();
    let mut warnings = Vec::new();
    let mut chars = value.chars();
    let mut literal = String::new();

    while let Some(c) = chars.next() {
        if c != '{' {
            literal.push(c);
            continue;
        }

        // Start of a placeholder
        let mut name = String::new();
        let mut closed = false;
        for inner in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            name.push(inner);
        }

        if !closed {
            warnings.push(Warning::new(format!("Unclosed placeholder '{{{}' in template", name)));
            literal.push('{');
            literal.push_str(&name);
        } else if name.is_empty() {
            warnings.push(Warning::new("Empty placeholder '{}' in template"));
            literal.push_str("{}");
        } else {
            push_literal(&mut segments, &literal);
            literal.clear();
            segments.push(Segment::Field(name));
        }
    }

    push_literal(&mut segments, &literal);
    (segments, warnings)
}

/// A parsed `output field -> template value` table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordTemplate {
    fields: OrderedMap<Vec<Segment>>,
}

impl RecordTemplate {
    /// Parse every value of a raw template table.
    ///
    /// Warnings are prefixed with the output field they belong to.
    pub fn parse(raw: &OrderedMap<String>) -> (Self, Vec<Warning>) {
        let mut fields = OrderedMap::with_capacity(raw.len());
        let mut warnings = Vec::new();

        for (name, value) in raw.iter() {
            let (segments, field_warnings) = tokenize_template(value);
            warnings.extend(
                field_warnings
                    .into_iter()
                    .map(|w| Warning::new(format!("field '{}': {}", name, w.message))),
            );
            fields.insert(name, segments);
        }

        (Self { fields }, warnings)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Record fields referenced by placeholders, in first-use order.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segments in self.fields.values() {
            for segment in segments {
                if let Segment::Field(name) = segment {
                    if !seen.contains(&name.as_str()) {
                        seen.push(name.as_str());
                    }
                }
            }
        }
        seen
    }

    /// Substitute placeholders with values from `record`.
    pub fn render(&self, record: &AttributeRecord) -> Result<AttributeRecord, ModifierError> {
        let mut out = AttributeRecord::with_capacity(self.fields.len());
        for (name, segments) in self.fields.iter() {
            let mut value = String::new();
            for segment in segments {
                match segment {
                    Segment::Literal(text) => value.push_str(text),
                    Segment::Field(field) => value.push_str(
                        record.get(field).ok_or_else(|| ModifierError::missing(field.as_str()))?,
                    ),
                }
            }
            out.insert(name.to_string(), value);
        }
        Ok(out)
    }

    pub fn into_modifier(self) -> Modifier {
        Modifier::new(move |record| self.render(record))
    }
}

impl Modifier {
    /// Compile a raw template table into a modifier, returning tokenizer warnings.
    pub fn from_template(raw: &OrderedMap<String>) -> (Modifier, Vec<Warning>) {
        let (template, warnings) = RecordTemplate::parse(raw);
        (template.into_modifier(), warnings)
    }
}
