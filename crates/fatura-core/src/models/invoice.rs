//! Invoice record extracted from OCR text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::amounts::checked_sum;

/// Default unit of measure for recovered line items.
pub const DEFAULT_UNIT: &str = "ADET";

/// Placeholder description for items whose text could not be recovered.
pub const PLACEHOLDER_DESCRIPTION: &str = "Item";

/// Column names in serialization order.
pub const FIELD_NAMES: [&str; 17] = [
    "invoice_number",
    "invoice_date",
    "buyer_name",
    "buyer_address",
    "tax_info",
    "tax_office_registration_number",
    "phone",
    "tax_office_name",
    "tax_registration_number",
    "quantities",
    "descriptions",
    "units",
    "amounts",
    "subtotal",
    "tax_amount",
    "grand_total",
    "amount_in_words",
];

/// Structured fields recovered from one invoice.
///
/// Absent scalar fields are empty strings or `None`. The four item columns
/// always have equal length; element `i` of each describes one line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number (Fatura No).
    pub invoice_number: String,

    /// Invoice date, `YYYY-MM-DD` when recognized, raw text otherwise.
    pub invoice_date: String,

    /// Buyer name or title (Alıcının Adı/Ünvanı).
    pub buyer_name: String,

    /// Buyer address line.
    pub buyer_address: String,

    /// Tax identity line as printed (VK Bilgisi).
    pub tax_info: String,

    /// Tax office registration number (V.D.H. No / VKN).
    pub tax_office_registration_number: String,

    /// Phone number.
    pub phone: String,

    /// Tax office the buyer is registered with (Bağlı olduğu V.D.).
    pub tax_office_name: String,

    /// Tax registry number (Vergi sicil no).
    pub tax_registration_number: String,

    /// Item quantities.
    pub quantities: Vec<Decimal>,

    /// Item descriptions.
    pub descriptions: Vec<String>,

    /// Item units.
    pub units: Vec<String>,

    /// Item amounts.
    pub amounts: Vec<Decimal>,

    /// Subtotal before tax (Ara Toplam).
    pub subtotal: Option<Decimal>,

    /// Tax amount (KDV).
    pub tax_amount: Option<Decimal>,

    /// Grand total (Genel Toplam).
    pub grand_total: Option<Decimal>,

    /// Total written out in words (Yazı ile toplam).
    pub amount_in_words: String,
}

/// A single recovered line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity, 1 when none is printed.
    pub quantity: Decimal,

    /// Product/service description.
    pub description: String,

    /// Unit of measure.
    pub unit: String,

    /// Line amount.
    pub amount: Decimal,
}

impl LineItem {
    /// Create an item with the default quantity and unit.
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            quantity: Decimal::ONE,
            description: description.into(),
            unit: DEFAULT_UNIT.to_string(),
            amount,
        }
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

impl InvoiceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the item columns with a projection of `items`.
    pub fn set_line_items(&mut self, items: &[LineItem]) {
        self.quantities = items.iter().map(|i| i.quantity).collect();
        self.descriptions = items.iter().map(|i| i.description.clone()).collect();
        self.units = items.iter().map(|i| i.unit.clone()).collect();
        self.amounts = items.iter().map(|i| i.amount).collect();
    }

    /// Rebuild line items from the item columns.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.quantities
            .iter()
            .zip(&self.descriptions)
            .zip(&self.units)
            .zip(&self.amounts)
            .map(|(((quantity, description), unit), amount)| LineItem {
                quantity: *quantity,
                description: description.clone(),
                unit: unit.clone(),
                amount: *amount,
            })
            .collect()
    }

    /// Number of line items.
    pub fn item_count(&self) -> usize {
        self.amounts.len()
    }

    /// True when nothing at all was recovered.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The invoice date as a calendar date, when it is canonical and valid.
    pub fn invoice_date_value(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.invoice_date, "%Y-%m-%d").ok()
    }

    /// Check the record for gaps and inconsistencies.
    ///
    /// `tolerance` bounds the accepted difference between
    /// `subtotal + tax_amount` and `grand_total`.
    pub fn validate(&self, tolerance: Decimal) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.invoice_date.is_empty() {
            issues.push("Missing invoice date".to_string());
        } else if self.invoice_date_value().is_none() {
            issues.push(format!(
                "Invoice date '{}' is not a valid calendar date",
                self.invoice_date
            ));
        }

        if self.buyer_name.is_empty() {
            issues.push("Missing buyer name".to_string());
        }

        if self.item_count() == 0 {
            issues.push("No line items".to_string());
        }

        if self.grand_total.is_none() {
            issues.push("Missing grand total".to_string());
        }

        if let (Some(subtotal), Some(tax), Some(total)) =
            (self.subtotal, self.tax_amount, self.grand_total)
        {
            match subtotal.checked_add(tax).and_then(|sum| sum.checked_sub(total)) {
                Some(difference) if difference.abs() > tolerance => issues.push(format!(
                    "Subtotal ({}) + tax ({}) differs from grand total ({}) by {}",
                    subtotal,
                    tax,
                    total,
                    difference.abs()
                )),
                Some(_) => {}
                None => issues.push(format!(
                    "Subtotal ({}) + tax ({}) overflows against grand total ({})",
                    subtotal, tax, total
                )),
            }
        }

        if let Some(subtotal) = self.subtotal {
            if self.item_count() > 0 {
                let items_sum = checked_sum(&self.amounts);
                match items_sum.and_then(|sum| sum.checked_sub(subtotal)) {
                    Some(difference) if difference.abs() > tolerance => issues.push(format!(
                        "Line item sum ({}) differs from subtotal ({})",
                        items_sum.unwrap_or_default(),
                        subtotal
                    )),
                    Some(_) => {}
                    None => issues.push("Line item sum overflows against subtotal".to_string()),
                }
            }
        }

        issues
    }
}
