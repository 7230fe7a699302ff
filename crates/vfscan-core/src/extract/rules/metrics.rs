//! Global index extraction (MD, PSD, VFI, ...) from free-text lines.

use crate::models::record::Field;

use super::patterns::METRIC_PATTERNS;
use super::{ExtractionMatch, FieldExtractor};

/// A metric value found on a line, already formatted as `"<number> dB"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricValue {
    pub field: Field,
    pub value: String,
}

/// Metric extractor.
///
/// A keyword is only tried when its literal text occurs in the line; the
/// match itself is case-insensitive.
pub struct MetricExtractor;

impl MetricExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MetricExtractor {
    type Output = ExtractionMatch<MetricValue>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (field, keyword, pattern) in METRIC_PATTERNS.iter() {
            if !text.contains(keyword) {
                continue;
            }

            if let Some(caps) = pattern.captures(text) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(
                        MetricValue {
                            field: *field,
                            value: format!("{} dB", &caps[1]),
                        },
                        full_match.as_str(),
                    )
                    .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}
