//! Configuration structures for the extraction pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FaturaError, Result};
use crate::models::invoice::{DEFAULT_UNIT, PLACEHOLDER_DESCRIPTION};

/// Main configuration for the fatura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// OCR command configuration.
    pub ocr: OcrConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,
}

/// External OCR command configuration.
///
/// The image is written to the command's stdin and the recognized text is
/// read from its stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Program to run.
    pub command: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            args: ["stdin", "stdout", "-l", "tur+eng"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Unit assigned to recovered line items.
    pub default_unit: String,

    /// Description used when an item's text cannot be recovered.
    pub placeholder_description: String,

    /// Fill a missing total from the other two (or from item amounts).
    pub derive_missing_totals: bool,

    /// Accepted difference between `subtotal + tax` and the grand total.
    pub consistency_tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_unit: DEFAULT_UNIT.to_string(),
            placeholder_description: PLACEHOLDER_DESCRIPTION.to_string(),
            derive_missing_totals: true,
            consistency_tolerance: Decimal::new(1, 2),
        }
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FaturaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
