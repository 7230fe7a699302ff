//! Extraction report: which critical fields are missing, and the
//! `{data: {text}, message}` shape handed to callers.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::record::{Field, PatientRecord};

use super::tagged::{ExtractionStatus, TaggedOutput};

/// Fields a report is not useful without.
pub const CRITICAL_FIELDS: [Field; 4] = [
    Field::Patient,
    Field::PatientId,
    Field::DateOfBirth,
    Field::TestType,
];

/// Critical fields that are unset or empty, in the order given.
pub fn missing_critical_fields(record: &PatientRecord, critical: &[Field]) -> Vec<Field> {
    critical
        .iter()
        .copied()
        .filter(|&field| !record.has(field))
        .collect()
}

/// Report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    /// The extracted record.
    pub text: PatientRecord,
}

/// Extracted record with a human-readable outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub data: ReportData,
    pub message: String,
}

impl ExtractionReport {
    /// Build a report from a tagged output.
    pub fn from_output(output: &TaggedOutput, critical: &[Field]) -> Self {
        let message = match output.status {
            ExtractionStatus::Complete => "PDF text extraction successful".to_string(),
            ExtractionStatus::Partial => {
                let missing = missing_critical_fields(&output.record, critical);
                if missing.is_empty() {
                    "PDF text extraction partially successful, some data may be missing"
                        .to_string()
                } else {
                    let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
                    format!(
                        "PDF text extraction partially successful. Missing critical fields: {}",
                        names.join(", ")
                    )
                }
            }
        };

        Self {
            data: ReportData {
                text: output.record.clone(),
            },
            message,
        }
    }

    /// Parse a `[(d)]{json}` string and build its report.
    pub fn from_tagged(tagged: &str, critical: &[Field]) -> Result<Self, ExtractionError> {
        let output = TaggedOutput::parse(tagged)?;
        Ok(Self::from_output(&output, critical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_critical_fields_in_order() {
        let mut record = PatientRecord::new();
        record.set(Field::PatientId, "A1");
        record.set(Field::TestType, "");

        assert_eq!(
            missing_critical_fields(&record, &CRITICAL_FIELDS),
            vec![Field::Patient, Field::DateOfBirth, Field::TestType]
        );
    }

    #[test]
    fn test_complete_message() {
        let mut record = PatientRecord::new();
        record.set(Field::PatientId, "A1");

        let report = ExtractionReport::from_output(&TaggedOutput::new(record), &CRITICAL_FIELDS);
        assert_eq!(report.message, "PDF text extraction successful");
        assert_eq!(report.data.text.get(Field::PatientId), Some("A1"));
    }

    #[test]
    fn test_partial_message_lists_missing() {
        let mut record = PatientRecord::new();
        record.set(Field::Patient, "Jane Doe");

        let report = ExtractionReport::from_output(&TaggedOutput::new(record), &CRITICAL_FIELDS);
        assert_eq!(
            report.message,
            "PDF text extraction partially successful. Missing critical fields: Patient ID, Date of Birth, Test Type"
        );
    }

    #[test]
    fn test_partial_message_without_missing_critical() {
        let mut record = PatientRecord::new();
        record.set(Field::Patient, "Jane Doe");

        let report = ExtractionReport::from_output(
            &TaggedOutput::new(record),
            &[Field::Patient],
        );
        assert_eq!(
            report.message,
            "PDF text extraction partially successful, some data may be missing"
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report =
            ExtractionReport::from_tagged("[(0)]{\"Patient\":\"X\"}", &CRITICAL_FIELDS).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["data"]["text"]["Patient"], "X");
        assert!(value["data"]["text"]["Patient ID"].is_null());
        assert!(value["message"].as_str().unwrap().contains("Patient ID"));
    }

    #[test]
    fn test_from_tagged_malformed() {
        assert!(ExtractionReport::from_tagged("garbage", &CRITICAL_FIELDS).is_err());
    }
}
