//! Line-oriented state machine that fills a [`PatientRecord`] from report
//! text.
//!
//! Reports mix three layouts:
//! - `Label: value` on a single line,
//! - a label-only line (`Label:`) followed by its value on the next line,
//! - a block of label-only lines followed by the same number of value
//!   lines, matched up in order.
//!
//! Lines without a colon are handed to the pattern rules (office address,
//! eye/test header, global indices).

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::models::record::{Field, PatientRecord};
use crate::report::{ExtractionStatus, TaggedOutput};

use super::buffer::{decode_lossy, LineBuffer};
use super::rules::{EyeTestGridExtractor, FieldExtractor, LocationExtractor, MetricExtractor};
use super::schema::{Admission, FieldSchema};
use super::{ReportParser, Result};

/// Number of lines after an address line that hold the eye/test header.
const HEADER_LINES: usize = 3;

/// Result of report extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted field values.
    pub record: PatientRecord,
    /// Whether the record carries a patient ID.
    pub status: ExtractionStatus,
    /// Number of lines scanned.
    pub line_count: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Tagged `[(d)]{json}` form of the record.
    pub fn to_tagged(&self) -> TaggedOutput {
        TaggedOutput {
            status: self.status,
            record: self.record.clone(),
        }
    }

    /// Consume the result into its tagged form.
    pub fn into_tagged(self) -> TaggedOutput {
        TaggedOutput {
            status: self.status,
            record: self.record,
        }
    }
}

/// Scan states. Pending labels are carried by the block states.
#[derive(Debug)]
enum ScanState<'a> {
    ScanningLine,
    CollectingLabelBlock(VecDeque<&'a str>),
    ConsumingValueBlock(VecDeque<&'a str>),
}

/// Parser for visual field single field analysis reports.
#[derive(Debug, Clone)]
pub struct VisualFieldParser {
    schema: FieldSchema,
    strict_utf8: bool,
}

impl VisualFieldParser {
    /// Create a parser with the standard schema.
    pub fn new() -> Self {
        Self {
            schema: FieldSchema::standard(),
            strict_utf8: true,
        }
    }

    /// Use a custom field schema.
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Fail on invalid UTF-8 (default) or decode lossily.
    pub fn with_strict_utf8(mut self, strict: bool) -> Self {
        self.strict_utf8 = strict;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    fn scan(&self, buffer: &LineBuffer<'_>) -> Result<ExtractionResult> {
        info!("Parsing report from {} lines of text", buffer.len());

        let scan = Scan {
            buffer,
            schema: &self.schema,
            cursor: 0,
            record: PatientRecord::new(),
            warnings: Vec::new(),
        };
        let (record, warnings) = scan.run()?;
        let status = ExtractionStatus::of(&record);

        debug!(
            "Extracted {} of {} fields, status {:?}",
            record.filled_count(),
            Field::COUNT,
            status
        );

        Ok(ExtractionResult {
            record,
            status,
            line_count: buffer.len(),
            warnings,
        })
    }
}

impl Default for VisualFieldParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser for VisualFieldParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        self.scan(&LineBuffer::new(text))
    }

    fn parse_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        if self.strict_utf8 {
            return self.scan(&LineBuffer::from_bytes(bytes)?);
        }

        let (text, replaced) = decode_lossy(bytes);
        let mut result = self.parse(&text)?;
        if replaced {
            warn!("Input contained invalid UTF-8, decoded lossily");
            result
                .warnings
                .insert(0, "Invalid UTF-8 sequences were replaced".to_string());
        }
        Ok(result)
    }
}

/// One extraction pass. Owns the cursor and the record being built.
struct Scan<'a, 's> {
    buffer: &'s LineBuffer<'a>,
    schema: &'s FieldSchema,
    cursor: usize,
    record: PatientRecord,
    warnings: Vec<String>,
}

impl<'a> Scan<'a, '_> {
    fn run(mut self) -> Result<(PatientRecord, Vec<String>)> {
        let mut state = ScanState::ScanningLine;

        while self.cursor < self.buffer.len() {
            state = match state {
                ScanState::ScanningLine => self.scan_line()?,
                ScanState::CollectingLabelBlock(labels) => self.collect_label(labels)?,
                ScanState::ConsumingValueBlock(labels) => self.consume_value(labels)?,
            };
        }

        match state {
            ScanState::CollectingLabelBlock(mut labels) => {
                self.warn_unset("label block", labels.make_contiguous());
            }
            ScanState::ConsumingValueBlock(mut labels) if !labels.is_empty() => {
                self.warn_unset("value block", labels.make_contiguous());
            }
            _ => {}
        }

        Ok((self.record, self.warnings))
    }

    fn scan_line(&mut self) -> Result<ScanState<'a>> {
        let line = self.buffer.line(self.cursor)?;

        let Some((label, rest)) = line.split_once(':') else {
            self.apply_patterns(line);
            self.cursor += 1;
            return Ok(ScanState::ScanningLine);
        };

        let value = rest.trim();
        if !value.is_empty() {
            self.assign(label, value);
            self.cursor += 1;
            return Ok(ScanState::ScanningLine);
        }

        match self.buffer.get(self.cursor + 1) {
            None => {
                self.warn_unset("label-only line", &[label]);
                self.cursor = self.buffer.len();
                Ok(ScanState::ScanningLine)
            }
            Some(next) if ends_with_colon(next) => {
                trace!("Label block starts at line {}", self.cursor);
                Ok(ScanState::CollectingLabelBlock(VecDeque::new()))
            }
            Some(next) => {
                self.assign(label, through_first_db(next));
                self.cursor += 2;
                Ok(ScanState::ScanningLine)
            }
        }
    }

    fn collect_label(&mut self, mut labels: VecDeque<&'a str>) -> Result<ScanState<'a>> {
        let line = self.buffer.line(self.cursor)?;

        if !ends_with_colon(line) {
            trace!(
                "Value block of {} lines starts at line {}",
                labels.len(),
                self.cursor
            );
            return Ok(ScanState::ConsumingValueBlock(labels));
        }

        labels.push_back(label_of(line));
        self.cursor += 1;
        Ok(ScanState::CollectingLabelBlock(labels))
    }

    fn consume_value(&mut self, mut labels: VecDeque<&'a str>) -> Result<ScanState<'a>> {
        let Some(label) = labels.pop_front() else {
            return Ok(ScanState::ScanningLine);
        };

        let line = self.buffer.line(self.cursor)?;
        let value = clean_value(line);
        let admission = self.schema.admit_in_block(label, &value);
        self.record_value(label, value, admission);
        self.cursor += 1;

        if labels.is_empty() {
            Ok(ScanState::ScanningLine)
        } else {
            Ok(ScanState::ConsumingValueBlock(labels))
        }
    }

    /// Assign an inline or single label-only value. No unit check.
    fn assign(&mut self, label: &str, raw: &str) {
        let admission = self.schema.admit(label);
        self.record_value(label, clean_value(raw), admission);
    }

    fn record_value(&mut self, label: &str, value: String, admission: Admission) {
        match admission {
            Admission::Accepted(field) => {
                debug!("{} = {:?}", field, value);
                self.record.set(field, value);
            }
            Admission::MissingUnit(field, unit) => {
                debug!("{} value {:?} lacks unit {}, skipped", field, value, unit);
                self.warnings.push(format!(
                    "{} value \"{}\" has no {} unit, left unset",
                    field, value, unit
                ));
            }
            Admission::Excluded(field) => {
                trace!("Label {:?} for {} excluded", label, field);
            }
            Admission::UnknownLabel => {
                trace!("Unknown label {:?}", label);
            }
        }
    }

    fn apply_patterns(&mut self, line: &str) {
        if let Some(location) = LocationExtractor::new().extract(line) {
            debug!(
                "Office Location = {:?} at {:?} in {:?}",
                location.value, location.position, location.source
            );
            self.record.set(Field::OfficeLocation, location.value);

            let following = self.buffer.window(self.cursor + 1, HEADER_LINES);
            if let Some(header) = EyeTestGridExtractor::new().extract_from_lines(following.iter().copied()) {
                trace!("Eye/test header from {:?}", header.source);
                let header = header.value;
                debug!("Eye = {:?}, Test Type = {:?}", header.eye, header.test_type);
                self.record.set(Field::Eye, header.eye);
                self.record.set(Field::TestType, header.test_type);
                if let Some(grid) = header.grid {
                    self.record.set(Field::Grid, grid);
                }
            }
        }

        for metric in MetricExtractor::new().extract_all(line) {
            debug!(
                "{} = {:?} from {:?}",
                metric.value.field, metric.value.value, metric.source
            );
            self.record.set(metric.value.field, metric.value.value);
        }
    }

    fn warn_unset(&mut self, context: &str, labels: &[&str]) {
        let known: Vec<&str> = labels
            .iter()
            .copied()
            .filter(|l| self.schema.lookup(l).is_some())
            .collect();
        if known.is_empty() {
            return;
        }

        warn!("Input ended inside {}, no value for {}", context, known.join(", "));
        self.warnings.push(format!(
            "Input ended inside {}; no value for {}",
            context,
            known.join(", ")
        ));
    }
}

fn ends_with_colon(line: &str) -> bool {
    line.trim_end().ends_with(':')
}

fn label_of(line: &str) -> &str {
    line.split_once(':').map_or(line, |(label, _)| label)
}

/// Prefix of `line` up to and including the first "dB", or the whole line.
fn through_first_db(line: &str) -> &str {
    match line.find("dB") {
        Some(pos) => &line[..pos + 2],
        None => line,
    }
}

fn clean_value(raw: &str) -> String {
    raw.replace(',', "").trim().to_string()
}
