//! Line buffer over decoded report text.

use std::borrow::Cow;

use crate::error::ExtractionError;

use super::Result;

/// Form feed inserted after each page when pages are concatenated.
pub const PAGE_SEPARATOR: char = '\x0c';

/// Ordered, index-addressable lines of one document's text.
///
/// Lines are split on `\n` and `\r\n`. Blank lines are kept and page
/// separators stay part of whatever line they fall on.
#[derive(Debug, Clone)]
pub struct LineBuffer<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LineBuffer<'a> {
    /// Split decoded text into lines.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    /// Decode raw bytes as UTF-8 and split them into lines.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, or [`ExtractionError::Bounds`] past the end.
    pub fn line(&self, index: usize) -> Result<&'a str> {
        self.get(index).ok_or(ExtractionError::Bounds {
            index,
            len: self.lines.len(),
        })
    }

    /// Line at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    /// Up to `count` lines starting at `index`, stopping at the end.
    pub fn window(&self, index: usize, count: usize) -> &[&'a str] {
        let start = index.min(self.lines.len());
        let end = index.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }
}

/// Decode bytes, replacing invalid UTF-8 sequences instead of failing.
///
/// Returns the text and whether any replacement happened.
pub fn decode_lossy(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let text = String::from_utf8_lossy(bytes);
    let replaced = matches!(text, Cow::Owned(_));
    (text, replaced)
}
