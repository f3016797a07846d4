//! Rule-based invoice parser for Turkish OCR text.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;

use super::rules::{
    amounts::{checked_sum, round_amount},
    contact::{digits_of, PhoneExtractor},
    dates::{find_date, parse_date},
    items::{extract_line_items, ItemOptions},
    labels::locate_labeled_amount,
    normalize::{normalize_text, split_lines},
    patterns::*,
    FieldExtractor,
};

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub record: InvoiceRecord,
    /// Text after normalization.
    pub normalized_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
///
/// Parsing never fails: fields that cannot be recovered stay empty and are
/// reported as warnings.
pub trait InvoiceParser {
    /// Parse invoice from OCR text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Invoice parser built on label patterns and line heuristics.
#[derive(Debug, Clone)]
pub struct RuleBasedParser {
    /// Defaults for recovered line items.
    item_options: ItemOptions,
    /// Whether to fill a missing total from the others.
    derive_missing_totals: bool,
    /// Accepted drift between `subtotal + tax` and the grand total.
    consistency_tolerance: Decimal,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            item_options: ItemOptions {
                default_unit: config.default_unit.clone(),
                placeholder_description: config.placeholder_description.clone(),
            },
            derive_missing_totals: config.derive_missing_totals,
            consistency_tolerance: config.consistency_tolerance,
        }
    }

    /// Set the unit assigned to line items.
    pub fn with_default_unit(mut self, unit: impl Into<String>) -> Self {
        self.item_options.default_unit = unit.into();
        self
    }

    /// Set the description used for items without recoverable text.
    pub fn with_placeholder_description(mut self, description: impl Into<String>) -> Self {
        self.item_options.placeholder_description = description.into();
        self
    }

    /// Enable or disable derivation of missing totals.
    pub fn with_total_derivation(mut self, derive: bool) -> Self {
        self.derive_missing_totals = derive;
        self
    }

    /// Set the tolerance of the totals consistency check.
    pub fn with_consistency_tolerance(mut self, tolerance: Decimal) -> Self {
        self.consistency_tolerance = tolerance;
        self
    }

    fn extract_invoice_number(&self, text: &str, lines: &[&str]) -> Option<String> {
        // Labeled number first
        if let Some(number) = lines
            .iter()
            .find_map(|line| INVOICE_NUMBER.captures(line).map(|caps| caps[1].to_string()))
        {
            return Some(number);
        }

        // e-Arşiv style id anywhere
        E_INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    fn extract_date(&self, lines: &[&str]) -> Option<String> {
        for label in [&*INVOICE_DATE_LABEL, &*SIGNATURE_DATE_LABEL] {
            if let Some(found) = lines
                .iter()
                .filter(|line| label.is_match(line))
                .find_map(|line| find_date(line))
            {
                debug!("date found on labeled line: {:?}", found.source);
                return Some(found.value);
            }
        }

        if let Some(found) = lines.iter().find_map(|line| find_date(line)) {
            debug!("date found on unlabeled line: {:?}", found.source);
            return Some(found.value);
        }

        // Keep an unrecognized labeled date as printed
        lines.iter().find_map(|line| {
            let label = INVOICE_DATE_LABEL.find(line)?;
            let rest = line[label.end()..].trim_start_matches(|c: char| c == ':' || c.is_whitespace());
            Some(parse_date(rest)).filter(|date| !date.is_empty())
        })
    }

    fn extract_buyer_name(&self, lines: &[&str]) -> Option<String> {
        let (idx, caps) = lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| BUYER_LABEL.captures(line).map(|caps| (idx, caps)))?;

        let rest = caps[1].trim_matches(|c: char| c == ':' || c.is_whitespace());
        if !rest.is_empty() {
            return Some(rest.to_string());
        }

        lines.get(idx + 1).map(|line| line.to_string())
    }

    /// Phone number and the address line printed above it.
    fn extract_phone_and_address(&self, lines: &[&str]) -> (Option<String>, Option<String>) {
        let extractor = PhoneExtractor::new();

        let phone = lines
            .iter()
            .filter(|line| PHONE_LABELED.is_match(line))
            .chain(lines.iter().filter(|line| !TAX_INFO_LINE.is_match(line)))
            .find_map(|line| extractor.extract(line))
            .map(|found| found.value);

        let Some(phone) = phone else {
            return (None, None);
        };

        let phone_digits = digits_of(&phone);
        let address = lines
            .iter()
            .position(|line| digits_of(line).contains(&phone_digits))
            .filter(|&idx| idx > 0)
            .map(|idx| lines[idx - 1].to_string());

        (Some(phone), address)
    }

    fn extract_tax_office_name(&self, lines: &[&str]) -> Option<String> {
        lines.iter().find_map(|line| {
            let caps = TAX_OFFICE_NAME.captures(line)?;
            let name = caps[1]
                .split_whitespace()
                .take_while(|word| !is_tax_stop_word(word))
                .collect::<Vec<_>>()
                .join(" ");
            Some(name).filter(|name| !name.is_empty())
        })
    }

    fn first_capture(&self, lines: &[&str], pattern: &regex::Regex) -> Option<String> {
        lines.iter().find_map(|line| {
            pattern
                .captures(line)
                .map(|caps| caps[1].trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }

    /// Fill missing totals in a single pass and check the result.
    ///
    /// A total that would overflow `Decimal` is left empty with a warning.
    fn reconcile_totals(&self, record: &mut InvoiceRecord, warnings: &mut Vec<String>) {
        if self.derive_missing_totals {
            if record.subtotal.is_none() && record.item_count() > 0 {
                match checked_sum(&record.amounts) {
                    Some(sum) => {
                        record.subtotal = Some(round_amount(sum));
                        debug!("derived subtotal {} from {} items", sum, record.item_count());
                    }
                    None => warnings.push(
                        "Could not derive subtotal: line item sum overflows".to_string(),
                    ),
                }
            }

            if record.grand_total.is_none() {
                if let (Some(subtotal), Some(tax)) = (record.subtotal, record.tax_amount) {
                    match subtotal.checked_add(tax) {
                        Some(total) => {
                            record.grand_total = Some(round_amount(total));
                            debug!("derived grand total from subtotal and tax");
                        }
                        None => warnings.push(
                            "Could not derive grand total: subtotal + tax overflows".to_string(),
                        ),
                    }
                }
            }

            if record.tax_amount.is_none() {
                if let (Some(subtotal), Some(total)) = (record.subtotal, record.grand_total) {
                    match total.checked_sub(subtotal) {
                        Some(tax) => {
                            record.tax_amount = Some(round_amount(tax));
                            debug!("derived tax from grand total and subtotal");
                        }
                        None => warnings.push(
                            "Could not derive tax: grand total - subtotal overflows".to_string(),
                        ),
                    }
                }
            }
        }

        if let (Some(subtotal), Some(tax), Some(total)) =
            (record.subtotal, record.tax_amount, record.grand_total)
        {
            match subtotal.checked_add(tax).and_then(|sum| sum.checked_sub(total)) {
                Some(difference) if difference.abs() > self.consistency_tolerance => {
                    warnings.push(format!(
                        "Totals are inconsistent: subtotal {} + tax {} differs from grand total {} by {}",
                        subtotal,
                        tax,
                        total,
                        difference.abs()
                    ));
                }
                Some(_) => {}
                None => warnings.push(format!(
                    "Totals are inconsistent: subtotal {} + tax {} overflows against grand total {}",
                    subtotal, tax, total
                )),
            }
        }
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RuleBasedParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let normalized_text = normalize_text(text);
        let lines = split_lines(&normalized_text);

        let mut record = InvoiceRecord::new();

        match self.extract_invoice_number(&normalized_text, &lines) {
            Some(number) => record.invoice_number = number,
            None => warnings.push("Could not extract invoice number".to_string()),
        }

        match self.extract_date(&lines) {
            Some(date) => record.invoice_date = date,
            None => warnings.push("Could not extract invoice date".to_string()),
        }

        match self.extract_buyer_name(&lines) {
            Some(name) => record.buyer_name = name,
            None => warnings.push("Could not extract buyer name".to_string()),
        }

        let (phone, address) = self.extract_phone_and_address(&lines);
        if phone.is_none() {
            warnings.push("Could not extract phone number".to_string());
        }
        record.phone = phone.unwrap_or_default();
        record.buyer_address = address.unwrap_or_default();

        record.tax_info = lines
            .iter()
            .find(|line| TAX_INFO_LINE.is_match(line))
            .map(|line| line.to_string())
            .unwrap_or_default();
        record.tax_office_registration_number =
            self.first_capture(&lines, &TAX_OFFICE_NUMBER).unwrap_or_default();
        record.tax_office_name = self.extract_tax_office_name(&lines).unwrap_or_default();
        record.tax_registration_number =
            self.first_capture(&lines, &TAX_REGISTRATION_NUMBER).unwrap_or_default();
        if record.tax_info.is_empty() && record.tax_office_registration_number.is_empty() {
            warnings.push("Could not extract tax identity".to_string());
        }

        record.amount_in_words = self.first_capture(&lines, &AMOUNT_IN_WORDS).unwrap_or_default();

        let items = extract_line_items(&lines, &self.item_options);
        if items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }
        record.set_line_items(&items);

        record.subtotal = locate_labeled_amount(&lines, &[&*SUBTOTAL_LABEL]);
        record.tax_amount = locate_labeled_amount(&lines, &[&*TAX_LABEL]);
        record.grand_total = locate_labeled_amount(&lines, &[&*GRAND_TOTAL_LABEL]);

        self.reconcile_totals(&mut record, &mut warnings);

        if record.grand_total.is_none() {
            warnings.push("Could not extract grand total".to_string());
        }

        debug!(
            "Extracted invoice {:?} with {} items and {} warnings",
            record.invoice_number,
            record.item_count(),
            warnings.len()
        );

        ExtractionResult {
            record,
            normalized_text,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Words that end a tax office name (`Kadıköy VKN: ...`).
fn is_tax_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    matches!(
        lower.trim_end_matches('.'),
        "vkn" | "tckn" | "no" | "vergi" | "sicil" | "tel" | "telefon" | "v" | "vd"
    )
}

/// Extract an invoice record from OCR text with default settings.
pub fn extract_invoice(text: &str) -> InvoiceRecord {
    RuleBasedParser::new().parse(text).record
}
