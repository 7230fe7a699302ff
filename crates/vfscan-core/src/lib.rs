//! Core library for visual field report extraction.
//!
//! This crate provides:
//! - A line-oriented extractor for the text layer of visual field printouts
//!   (patient identity, test parameters, global indices)
//! - The fixed field schema and the `[(d)]{json}` tagged output format
//! - Extraction reports listing missing critical fields
//! - PDF text extraction (with the `native` feature)

pub mod error;
pub mod extract;
pub mod models;
#[cfg(feature = "native")]
pub mod pdf;
pub mod report;

pub use error::{ExtractionError, PdfError, Result, VfscanError};
pub use extract::{ExtractionResult, FieldSchema, LineBuffer, ReportParser, VisualFieldParser};
pub use models::config::VfscanConfig;
pub use models::record::{Field, PatientRecord};
#[cfg(feature = "native")]
pub use pdf::{PdfTextExtractor, PdfTextSource};
pub use report::{ExtractionReport, ExtractionStatus, TaggedOutput, CRITICAL_FIELDS};

/// Extract a report from decoded text and return the tagged output string.
pub fn extract_tagged(text: &str) -> std::result::Result<String, ExtractionError> {
    let result = VisualFieldParser::new().parse(text)?;
    Ok(result.into_tagged().to_string())
}
