//! Patient record model for visual field report extraction.
//!
//! The set of fields is closed: every value the extractor can produce is
//! addressed through [`Field`], and a [`PatientRecord`] always carries a slot
//! for each of them.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractionError;

/// A known report field, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Patient,
    DateOfBirth,
    Gender,
    PatientId,
    OfficeLocation,
    TestType,
    Created,
    FixationMonitor,
    FixationTarget,
    FixationLosses,
    FalsePosErrors,
    FalseNegErrors,
    TestDuration,
    Fovea,
    Stimulus,
    Background,
    Strategy,
    PupilDiameter,
    VisualAcuity,
    Rx,
    Date,
    Time,
    Age,
    Eye,
    Grid,
    Md10_2,
    Psd10_2,
    Sf,
    Cpsd,
    Md,
    Psd,
    Vfi,
    Ght,
}

impl Field {
    /// Number of known fields.
    pub const COUNT: usize = 33;

    /// All fields in declaration order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Patient,
        Field::DateOfBirth,
        Field::Gender,
        Field::PatientId,
        Field::OfficeLocation,
        Field::TestType,
        Field::Created,
        Field::FixationMonitor,
        Field::FixationTarget,
        Field::FixationLosses,
        Field::FalsePosErrors,
        Field::FalseNegErrors,
        Field::TestDuration,
        Field::Fovea,
        Field::Stimulus,
        Field::Background,
        Field::Strategy,
        Field::PupilDiameter,
        Field::VisualAcuity,
        Field::Rx,
        Field::Date,
        Field::Time,
        Field::Age,
        Field::Eye,
        Field::Grid,
        Field::Md10_2,
        Field::Psd10_2,
        Field::Sf,
        Field::Cpsd,
        Field::Md,
        Field::Psd,
        Field::Vfi,
        Field::Ght,
    ];

    /// Label used for this field in reports and in serialized records.
    pub fn name(self) -> &'static str {
        match self {
            Field::Patient => "Patient",
            Field::DateOfBirth => "Date of Birth",
            Field::Gender => "Gender",
            Field::PatientId => "Patient ID",
            Field::OfficeLocation => "Office Location",
            Field::TestType => "Test Type",
            Field::Created => "Created",
            Field::FixationMonitor => "Fixation Monitor",
            Field::FixationTarget => "Fixation Target",
            Field::FixationLosses => "Fixation Losses",
            Field::FalsePosErrors => "False POS Errors",
            Field::FalseNegErrors => "False NEG Errors",
            Field::TestDuration => "Test Duration",
            Field::Fovea => "Fovea",
            Field::Stimulus => "Stimulus",
            Field::Background => "Background",
            Field::Strategy => "Strategy",
            Field::PupilDiameter => "Pupil Diameter",
            Field::VisualAcuity => "Visual Acuity",
            Field::Rx => "Rx",
            Field::Date => "Date",
            Field::Time => "Time",
            Field::Age => "Age",
            Field::Eye => "Eye",
            Field::Grid => "Grid",
            Field::Md10_2 => "MD10-2",
            Field::Psd10_2 => "PSD10-2",
            Field::Sf => "SF",
            Field::Cpsd => "CPSD",
            Field::Md => "MD",
            Field::Psd => "PSD",
            Field::Vfi => "VFI",
            Field::Ght => "GHT",
        }
    }

    /// Look up a field by its exact label. Labels are case- and
    /// whitespace-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracted values for every known field of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    values: [Option<String>; Field::COUNT],
}

impl PatientRecord {
    /// Create a record with every field unset.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| None),
        }
    }

    /// Value of a field, if set.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Value of a field, or [`ExtractionError::MissingField`] when it is
    /// unset or empty.
    pub fn require(&self, field: Field) -> Result<&str, ExtractionError> {
        match self.get(field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ExtractionError::MissingField(field.name().to_string())),
        }
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = Some(value.into());
    }

    /// Whether the field holds a non-empty value.
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }

    /// Iterate over all fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Number of fields holding a value.
    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// True when no field has been set.
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for PatientRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PatientRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = PatientRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of known report field names to strings or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = PatientRecord::new();
        while let Some(key) = access.next_key::<String>()? {
            let field = Field::from_name(&key)
                .ok_or_else(|| de::Error::custom(format!("unknown field `{}`", key)))?;
            let value: Option<String> = access.next_value()?;
            record.values[field.index()] = value;
        }
        Ok(record)
    }
}
