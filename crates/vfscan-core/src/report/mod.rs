//! Result assembly: status tag, tagged output string, and extraction
//! reports.

mod summary;
mod tagged;

pub use summary::{missing_critical_fields, ExtractionReport, ReportData, CRITICAL_FIELDS};
pub use tagged::{ExtractionStatus, TaggedOutput};
