//! PDF text source.
//!
//! Produces the page-concatenated text the extractor consumes: every page's
//! text followed by a form feed.

mod extractor;

pub use extractor::PdfTextExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text layer sources.
pub trait PdfTextSource {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text of each page.
    fn extract_pages(&self) -> Result<Vec<String>>;

    /// Extract all pages, each followed by a page separator.
    fn extract_text(&self) -> Result<String>;
}
