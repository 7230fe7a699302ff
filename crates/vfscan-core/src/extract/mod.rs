//! Report field extraction module.

pub mod buffer;
mod parser;
pub mod rules;
pub mod schema;

pub use buffer::{LineBuffer, PAGE_SEPARATOR};
pub use parser::{ExtractionResult, VisualFieldParser};
pub use schema::{Admission, Exclusion, FieldRule, FieldSchema};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for report parsing.
pub trait ReportParser {
    /// Parse a report from decoded text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;

    /// Parse a report from raw bytes, decoding them as UTF-8 first.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        self.parse(std::str::from_utf8(bytes)?)
    }
}
