//! WASM bindings for Turkish invoice field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR runs on the JavaScript side; these bindings take the recognized text.

use wasm_bindgen::prelude::*;

use fatura_core::invoice::{InvoiceParser, RuleBasedParser};
use fatura_core::ExtractionConfig;

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

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract invoice data from OCR text.
///
/// Returns the invoice record as a plain object; amounts are decimal strings.
#[wasm_bindgen]
pub fn extract_invoice_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&fatura_core::extract_invoice(text))
}

/// Normalize raw OCR text.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    fatura_core::normalize_text(text)
}

/// Parse a Turkish-formatted amount (e.g., "₺116.000,00") into a decimal
/// string with two fraction digits.
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<String> {
    fatura_core::parse_amount(amount).map(|d| d.to_string())
}

/// Format a decimal string in Turkish style (1.234,56).
#[wasm_bindgen]
pub fn format_amount(amount: &str) -> Option<String> {
    fatura_core::parse_amount(amount).map(fatura_core::format_turkish_amount)
}

/// Parse a date into `YYYY-MM-DD`; unrecognized input is returned trimmed.
#[wasm_bindgen]
pub fn parse_date(date_str: &str) -> String {
    fatura_core::parse_date(date_str)
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    config: ExtractionConfig,
    parser: RuleBasedParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create a new invoice extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            parser: RuleBasedParser::from_config(&config),
            config,
        }
    }

    /// Set the unit assigned to line items.
    #[wasm_bindgen]
    pub fn set_default_unit(&mut self, unit: &str) {
        self.config.default_unit = unit.to_string();
        self.rebuild();
    }

    /// Enable or disable derivation of missing totals.
    #[wasm_bindgen]
    pub fn set_derive_missing_totals(&mut self, derive: bool) {
        self.config.derive_missing_totals = derive;
        self.rebuild();
    }

    /// Extract invoice from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).record)
    }

    /// Get extraction result with normalized text and warnings.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    fn rebuild(&mut self) {
        self.parser = RuleBasedParser::from_config(&self.config);
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}
