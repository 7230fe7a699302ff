//! The `[(d)]{json}` tagged output format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::record::{Field, PatientRecord};

/// Completeness of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// A patient ID was found.
    Complete,
    /// No patient ID; other fields may still be present.
    Partial,
}

impl ExtractionStatus {
    /// Status of a finished record.
    pub fn of(record: &PatientRecord) -> Self {
        if record.has(Field::PatientId) {
            Self::Complete
        } else {
            Self::Partial
        }
    }

    /// Digit used in the status tag.
    pub fn digit(self) -> char {
        match self {
            Self::Complete => '1',
            Self::Partial => '0',
        }
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Complete),
            '0' => Some(Self::Partial),
            _ => None,
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// A record together with its status tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedOutput {
    pub status: ExtractionStatus,
    pub record: PatientRecord,
}

impl TaggedOutput {
    /// Tag a record with the status it implies.
    pub fn new(record: PatientRecord) -> Self {
        Self {
            status: ExtractionStatus::of(&record),
            record,
        }
    }

    /// Parse a `[(d)]{json}` string.
    pub fn parse(s: &str) -> Result<Self, ExtractionError> {
        let malformed = |reason: &str| ExtractionError::MalformedOutput(reason.to_string());

        let rest = s
            .strip_prefix("[(")
            .ok_or_else(|| malformed("missing [( prefix"))?;
        let mut chars = rest.chars();
        let digit = chars.next().ok_or_else(|| malformed("missing status digit"))?;
        let status = ExtractionStatus::from_digit(digit)
            .ok_or_else(|| malformed(&format!("unknown status digit {:?}", digit)))?;
        let json = chars
            .as_str()
            .strip_prefix(")]")
            .ok_or_else(|| malformed("missing )] after status digit"))?;

        let record: PatientRecord =
            serde_json::from_str(json).map_err(|e| malformed(&e.to_string()))?;

        Ok(Self { status, record })
    }
}

impl fmt::Display for TaggedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.record).map_err(|_| fmt::Error)?;
        write!(f, "[({})]{}", self.status.digit(), json)
    }
}

impl FromStr for TaggedOutput {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
