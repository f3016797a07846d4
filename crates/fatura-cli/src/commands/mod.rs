//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use fatura_core::{
    CommandOcr, ExtractionResult, FaturaConfig, InvoiceParser, InvoicePipeline, RuleBasedParser,
};

/// Image formats sent through the OCR command.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Whether `path` is a file the CLI can process.
pub fn is_supported(path: &Path) -> bool {
    let extension = file_extension(path);
    extension == "txt" || IMAGE_EXTENSIONS.contains(&extension.as_str())
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fatura")
        .join("config.json")
}

/// The configuration file in effect: `--config` or the default location.
pub fn config_file_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, the default file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FaturaConfig> {
    let path = config_file_path(config_path);
    if config_path.is_none() && !path.exists() {
        return Ok(FaturaConfig::default());
    }

    FaturaConfig::from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Extract invoice fields from a text or image file.
pub fn extract_file(path: &Path, config: &FaturaConfig) -> anyhow::Result<ExtractionResult> {
    let parser = RuleBasedParser::from_config(&config.extraction);
    let extension = file_extension(path);

    match extension.as_str() {
        "txt" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!("Read {} characters from {}", text.len(), path.display());
            Ok(parser.parse(&text))
        }
        ext if IMAGE_EXTENSIONS.contains(&ext) => {
            let image = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let pipeline = InvoicePipeline::new(CommandOcr::from_config(&config.ocr), parser);
            pipeline
                .process_image(&image)
                .with_context(|| format!("OCR failed for {}", path.display()))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
