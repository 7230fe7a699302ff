//! Common regex patterns for visual field report extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::Field;

/// Metric keywords scanned on free-text lines, with the field each fills.
pub const METRIC_KEYWORDS: [(&str, Field); 7] = [
    ("MD", Field::Md),
    ("PSD", Field::Psd),
    ("VFI", Field::Vfi),
    ("SF", Field::Sf),
    ("CPSD", Field::Cpsd),
    ("MD10-2", Field::Md10_2),
    ("PSD10-2", Field::Psd10_2),
];

/// Delimiter between the eye side and the test description.
pub const SINGLE_FIELD_ANALYSIS: &str = "Single Field Analysis";

lazy_static! {
    // Office address: street number, name tokens, then a road-type keyword
    // (English or French, full or abbreviated), then trailing tokens.
    pub static ref OFFICE_ADDRESS: Regex = Regex::new(
        r"(?i)^[0-9]+[ |\[a-zà-ú.,\-]* (?:highway|autoroute|north|nord|south|sud|east|est|west|ouest|avenue|lane|voie|ruelle|road|rue|route|drive|boulevard|circle|cercle|street|cer\.|cir\.|blvd\.|hway\.|st\.|aut\.|ave\.|ln\.|rd\.|hw\.|dr\.|a\.)(?:[ .,\-]*[a-zà-ú0-9]*)*"
    ).unwrap();

    // Eye side header, e.g. "OS Central 24-2 Threshold Test"
    pub static ref EYE_TEST_GRID: Regex = Regex::new(
        r"^(?:OS|OD)?.+(?:Test|$)"
    ).unwrap();

    // Footnote-like labels such as "see /2/"
    pub static ref NUMERIC_SLASH: Regex = Regex::new(
        r"/\d+/"
    ).unwrap();

    // Signed decimal followed by dB, anchored on each metric keyword
    pub static ref METRIC_PATTERNS: Vec<(Field, &'static str, Regex)> = METRIC_KEYWORDS
        .iter()
        .map(|&(keyword, field)| {
            let pattern = format!(r"(?i){}[:\s]*([-+]?\d+\.\d+)\s*dB", regex::escape(keyword));
            (field, keyword, Regex::new(&pattern).unwrap())
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_requires_leading_number() {
        assert!(OFFICE_ADDRESS.is_match("123 Main Street"));
        assert!(!OFFICE_ADDRESS.is_match("Main Street 123"));
    }

    #[test]
    fn test_address_french_keywords() {
        let m = OFFICE_ADDRESS
            .find("4250 rue Sainte-Catherine Ouest, Montréal")
            .unwrap();
        assert_eq!(m.as_str(), "4250 rue Sainte-Catherine Ouest, Montréal");
        assert!(OFFICE_ADDRESS.is_match("12 boul. des Laurentides Autoroute 15"));
    }

    #[test]
    fn test_address_abbreviations() {
        assert!(OFFICE_ADDRESS.is_match("55 Bank St. Ottawa"));
        assert!(OFFICE_ADDRESS.is_match("900 Sunset BLVD. Suite 4"));
        assert!(!OFFICE_ADDRESS.is_match("30 Stimulus Size"));
    }

    #[test]
    fn test_numeric_slash() {
        assert!(NUMERIC_SLASH.is_match("Note /12/"));
        assert!(!NUMERIC_SLASH.is_match("Fixation Losses"));
        assert!(!NUMERIC_SLASH.is_match("1/2"));
    }

    #[test]
    fn test_metric_patterns_compiled_for_every_keyword() {
        assert_eq!(METRIC_PATTERNS.len(), METRIC_KEYWORDS.len());
        let (_, _, md) = &METRIC_PATTERNS[0];
        let caps = md.captures("MD: -2.50 dB P < 5%").unwrap();
        assert_eq!(&caps[1], "-2.50");
    }
}
