//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::VfscanError;
use crate::models::record::Field;

/// Main configuration for the vfscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VfscanConfig {
    /// Report extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Report extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fields whose absence is called out in extraction reports.
    pub critical_fields: Vec<String>,

    /// Fail on invalid UTF-8 instead of decoding lossily.
    pub strict_utf8: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            critical_fields: crate::report::CRITICAL_FIELDS
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            strict_utf8: true,
        }
    }
}

impl ExtractionConfig {
    /// Resolve the configured critical field names against the schema.
    pub fn critical_fields(&self) -> Result<Vec<Field>, VfscanError> {
        self.critical_fields
            .iter()
            .map(|name| {
                Field::from_name(name)
                    .ok_or_else(|| VfscanError::Config(format!("unknown critical field: {}", name)))
            })
            .collect()
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider the PDF as having a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 20,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output. Never applies to the tagged format.
    pub pretty: bool,
}

impl VfscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_critical_fields_resolve() {
        let config = VfscanConfig::default();
        let fields = config.extraction.critical_fields().unwrap();
        assert_eq!(
            fields,
            vec![Field::Patient, Field::PatientId, Field::DateOfBirth, Field::TestType]
        );
    }

    #[test]
    fn test_unknown_critical_field_is_config_error() {
        let mut config = VfscanConfig::default();
        config.extraction.critical_fields.push("Shoe Size".to_string());
        assert!(matches!(
            config.extraction.critical_fields(),
            Err(VfscanError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"pdf":{"max_pages":2}}"#).unwrap();

        let config = VfscanConfig::from_file(&path).unwrap();
        assert_eq!(config.pdf.max_pages, 2);
        assert_eq!(config.pdf.min_text_length, 20);
        assert!(config.extraction.strict_utf8);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = VfscanConfig::default();
        config.output.pretty = true;
        config.save(&path).unwrap();

        let loaded = VfscanConfig::from_file(&path).unwrap();
        assert!(loaded.output.pretty);
    }
}
