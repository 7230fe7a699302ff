//! Office location and eye/test header extraction.

use super::patterns::{EYE_TEST_GRID, OFFICE_ADDRESS, SINGLE_FIELD_ANALYSIS};
use super::{ExtractionMatch, FieldExtractor};

/// Office address extractor.
///
/// Matches a line that starts with a street number and contains a road-type
/// keyword; the whole matched span is the location.
pub struct LocationExtractor;

impl LocationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LocationExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        OFFICE_ADDRESS.find(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_string(), text).with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines().filter_map(|line| self.extract(line)).collect()
    }
}

/// Eye side, test type and grid parsed from the header that follows the
/// office address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyeTestGrid {
    /// Eye side, e.g. "OS" or "OD".
    pub eye: String,
    /// Test description, e.g. "Central 24-2 Threshold Test".
    pub test_type: String,
    /// Grid token, e.g. "24-2".
    pub grid: Option<String>,
}

/// Extractor for the "<eye> Single Field Analysis <test type>" header.
pub struct EyeTestGridExtractor;

impl EyeTestGridExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the header from the lines following an address line, joined
    /// with single spaces.
    pub fn extract_from_lines<'a, I>(&self, lines: I) -> Option<ExtractionMatch<EyeTestGrid>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = lines.into_iter().collect::<Vec<_>>().join(" ");
        self.extract(&joined)
    }
}

impl Default for EyeTestGridExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EyeTestGridExtractor {
    type Output = ExtractionMatch<EyeTestGrid>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if !EYE_TEST_GRID.is_match(text) {
            return None;
        }

        // Anything after a repeated delimiter is dropped
        let mut segments = text.split(SINGLE_FIELD_ANALYSIS);
        let left = segments.next()?;
        let test_type = segments.next()?.trim();

        Some(ExtractionMatch::new(
            EyeTestGrid {
                eye: left.trim().to_string(),
                test_type: test_type.to_string(),
                grid: test_type.split_whitespace().nth(1).map(str::to_string),
            },
            text,
        ))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_location_span() {
        let m = LocationExtractor::new()
            .extract("1 Eye Way Road, Ottawa ON")
            .unwrap();
        assert_eq!(m.value, "1 Eye Way Road, Ottawa ON");
        assert_eq!(m.position, Some((0, 25)));
    }

    #[test]
    fn test_location_extract_all_per_line() {
        let text = "Clinic\n10 King Street\nPatient: X\n22 rue Principale";
        let found = LocationExtractor::new().extract_all(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].value, "22 rue Principale");
    }

    #[test]
    fn test_eye_test_grid_from_lines() {
        let lines = ["OS", "Single Field Analysis", "Central 24-2 Threshold Test"];
        let header = EyeTestGridExtractor::new()
            .extract_from_lines(lines)
            .unwrap()
            .value;

        assert_eq!(header.eye, "OS");
        assert_eq!(header.test_type, "Central 24-2 Threshold Test");
        assert_eq!(header.grid.as_deref(), Some("24-2"));
    }

    #[test]
    fn test_eye_test_grid_requires_delimiter() {
        let extractor = EyeTestGridExtractor::new();
        assert!(extractor.extract("OD Central 30-2 Threshold Test").is_none());
        assert!(extractor.extract("").is_none());
    }

    #[test]
    fn test_eye_test_grid_single_token_test_type() {
        let header = EyeTestGridExtractor::new()
            .extract("OD Single Field Analysis Screening")
            .unwrap()
            .value;
        assert_eq!(header.eye, "OD");
        assert_eq!(header.test_type, "Screening");
        assert_eq!(header.grid, None);
    }

    #[test]
    fn test_eye_test_grid_repeated_delimiter() {
        let header = EyeTestGridExtractor::new()
            .extract("OS Single Field Analysis Central 10-2 Threshold Test Single Field Analysis")
            .unwrap()
            .value;
        assert_eq!(header.eye, "OS");
        assert_eq!(header.test_type, "Central 10-2 Threshold Test");
        assert_eq!(header.grid.as_deref(), Some("10-2"));
    }
}
