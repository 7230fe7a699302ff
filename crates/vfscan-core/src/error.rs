//! Error types for the vfscan-core library.

use thiserror::Error;

/// Main error type for the vfscan library.
#[derive(Error, Debug)]
pub enum VfscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to report field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// A line index fell outside the line buffer.
    #[error("line index {index} out of bounds for buffer of {len} lines")]
    Bounds { index: usize, len: usize },

    /// A requested field has no value.
    #[error("field not found: {0}")]
    MissingField(String),

    /// A tagged output string does not have the `[(d)]{json}` shape.
    #[error("malformed tagged output: {0}")]
    MalformedOutput(String),
}

/// Result type for the vfscan library.
pub type Result<T> = std::result::Result<T, VfscanError>;
