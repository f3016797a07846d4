//! Core library for Turkish invoice OCR text processing.
//!
//! This crate provides:
//! - OCR text normalization (Unicode, OCR confusions, currency, whitespace)
//! - Turkish amount and date parsing
//! - Rule-based invoice field and line-item extraction
//! - An OCR service seam with an external recognizer command

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;

pub use error::{FaturaError, OcrError, Result};
pub use models::config::{ExtractionConfig, FaturaConfig, OcrConfig};
pub use models::invoice::{InvoiceRecord, LineItem, FIELD_NAMES};
pub use ocr::{CommandOcr, InvoicePipeline, OcrService};
pub use invoice::{extract_invoice, ExtractionResult, InvoiceParser, RuleBasedParser};
pub use invoice::rules::{format_turkish_amount, normalize_text, parse_amount, parse_date};
