//! WASM bindings for visual field report extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Callers extract the PDF text layer themselves and pass the decoded text in.

use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use vfscan_core::report::missing_critical_fields as missing_fields;
use vfscan_core::{
    ExtractionReport, ExtractionStatus, PatientRecord, ReportParser, VisualFieldParser,
    CRITICAL_FIELDS,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Convert to a plain JS object, with `null` for unset fields.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(to_js_error)
}

/// Extract a report and return the tagged `[(d)]{json}` string.
#[wasm_bindgen]
pub fn extract_tagged(text: &str) -> Result<String, JsValue> {
    vfscan_core::extract_tagged(text).map_err(to_js_error)
}

/// Extract a report and return the record as a plain object.
#[wasm_bindgen]
pub fn extract_record(text: &str) -> Result<JsValue, JsValue> {
    let result = VisualFieldParser::new().parse(text).map_err(to_js_error)?;

    to_js(&result.record)
}

/// Extract a report and wrap it as `{ data: { text }, message }`.
#[wasm_bindgen]
pub fn extract_report(text: &str) -> Result<JsValue, JsValue> {
    let result = VisualFieldParser::new().parse(text).map_err(to_js_error)?;
    let report = ExtractionReport::from_output(&result.into_tagged(), &CRITICAL_FIELDS);

    to_js(&report)
}

/// Names of the critical fields the report is missing.
#[wasm_bindgen]
pub fn missing_critical_fields(text: &str) -> Result<Array, JsValue> {
    let result = VisualFieldParser::new().parse(text).map_err(to_js_error)?;

    Ok(missing_field_names(&result.record)
        .into_iter()
        .map(JsValue::from_str)
        .collect())
}

fn missing_field_names(record: &PatientRecord) -> Vec<&'static str> {
    missing_fields(record, &CRITICAL_FIELDS)
        .into_iter()
        .map(|f| f.name())
        .collect()
}

/// Visual field extractor class for browser use.
#[wasm_bindgen]
pub struct VisualFieldExtractor {
    parser: VisualFieldParser,
}

#[wasm_bindgen]
impl VisualFieldExtractor {
    /// Create a new extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: VisualFieldParser::new(),
        }
    }

    /// Replace invalid UTF-8 in `extract_bytes` input instead of failing.
    #[wasm_bindgen]
    pub fn set_strict_utf8(&mut self, strict: bool) {
        self.parser = self.parser.clone().with_strict_utf8(strict);
    }

    /// Extract the record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text).map_err(to_js_error)?;

        to_js(&result.record)
    }

    /// Extract the record from raw bytes, e.g. a `Uint8Array`.
    #[wasm_bindgen]
    pub fn extract_bytes(&self, data: &[u8]) -> Result<JsValue, JsValue> {
        let result = self.parser.parse_bytes(data).map_err(to_js_error)?;

        to_js(&result.record)
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text).map_err(to_js_error)?;

        #[derive(serde::Serialize)]
        struct ExtractResult {
            record: PatientRecord,
            status: ExtractionStatus,
            missing_critical: Vec<&'static str>,
            warnings: Vec<String>,
            line_count: usize,
        }

        let output = ExtractResult {
            missing_critical: missing_field_names(&result.record),
            record: result.record,
            status: result.status,
            warnings: result.warnings,
            line_count: result.line_count,
        };

        to_js(&output)
    }
}

impl Default for VisualFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}
