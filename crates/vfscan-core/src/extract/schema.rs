//! Declarative field schema: which labels are known and what each one
//! requires of its value.

use regex::Regex;

use crate::models::record::Field;

use super::rules::patterns::NUMERIC_SLASH;

/// Label patterns that disqualify an otherwise known label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Footnote-like `/<digits>/` token.
    NumericSlash,
}

impl Exclusion {
    fn regex(self) -> &'static Regex {
        match self {
            Exclusion::NumericSlash => &*NUMERIC_SLASH,
        }
    }

    /// Whether the label is rejected by this exclusion.
    pub fn rejects(self, label: &str) -> bool {
        self.regex().is_match(label)
    }
}

/// Extraction rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Substring the value must contain to be assigned.
    pub required_unit: Option<&'static str>,
    /// Label pattern that blocks assignment.
    pub exclusion: Option<Exclusion>,
}

impl FieldRule {
    pub const fn new() -> Self {
        Self {
            required_unit: None,
            exclusion: Some(Exclusion::NumericSlash),
        }
    }

    pub const fn with_unit(mut self, unit: &'static str) -> Self {
        self.required_unit = Some(unit);
        self
    }

    pub const fn without_exclusion(mut self) -> Self {
        self.exclusion = None;
        self
    }

    /// Whether the label passes the exclusion pattern.
    pub fn accepts_label(&self, label: &str) -> bool {
        self.exclusion.is_none_or(|e| !e.rejects(label))
    }

    /// Whether the raw value line satisfies the unit requirement.
    pub fn accepts_value(&self, value: &str) -> bool {
        self.required_unit.is_none_or(|unit| value.contains(unit))
    }
}

impl Default for FieldRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of checking a label/value pair against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The value may be assigned to this field.
    Accepted(Field),
    /// The label is not a schema field.
    UnknownLabel,
    /// The label matched an exclusion pattern.
    Excluded(Field),
    /// The value lacks the field's required unit.
    MissingUnit(Field, &'static str),
}

/// The fixed table of known fields and their rules.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    rules: [FieldRule; Field::COUNT],
}

impl FieldSchema {
    /// Schema for visual field single field analysis printouts.
    pub fn standard() -> Self {
        let mut schema = Self {
            rules: [FieldRule::new(); Field::COUNT],
        };
        schema.set_rule(Field::PupilDiameter, FieldRule::new().with_unit("mm"));
        schema
    }

    /// Replace the rule for one field.
    pub fn with_rule(mut self, field: Field, rule: FieldRule) -> Self {
        self.set_rule(field, rule);
        self
    }

    fn set_rule(&mut self, field: Field, rule: FieldRule) {
        self.rules[field as usize] = rule;
    }

    /// Rule for a field.
    pub fn rule(&self, field: Field) -> &FieldRule {
        &self.rules[field as usize]
    }

    /// Resolve a label to a field, if known.
    pub fn lookup(&self, label: &str) -> Option<Field> {
        Field::from_name(label)
    }

    /// Check whether a value may be assigned under `label` on an inline or
    /// single label-only line. Only the label and its exclusion are checked.
    pub fn admit(&self, label: &str) -> Admission {
        let Some(field) = self.lookup(label) else {
            return Admission::UnknownLabel;
        };
        if !self.rule(field).accepts_label(label) {
            return Admission::Excluded(field);
        }
        Admission::Accepted(field)
    }

    /// Check a value-block line for `label`. On top of [`admit`](Self::admit),
    /// the line must carry the field's required unit.
    pub fn admit_in_block(&self, label: &str, value: &str) -> Admission {
        match self.admit(label) {
            Admission::Accepted(field) => {
                let rule = self.rule(field);
                match rule.required_unit {
                    Some(unit) if !rule.accepts_value(value) => Admission::MissingUnit(field, unit),
                    _ => Admission::Accepted(field),
                }
            }
            other => other,
        }
    }

    /// Iterate over fields and rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldRule)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.rule(f)))
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::standard()
    }
}
