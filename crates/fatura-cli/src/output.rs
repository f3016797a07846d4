//! Rendering of invoice records as JSON, CSV and text.

use rust_decimal::Decimal;

use fatura_core::{format_turkish_amount, InvoiceRecord, FIELD_NAMES};

/// Output format for invoice records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Record values in `FIELD_NAMES` order, item sequences joined with `; `.
pub fn record_row(record: &InvoiceRecord) -> Vec<String> {
    vec![
        record.invoice_number.clone(),
        record.invoice_date.clone(),
        record.buyer_name.clone(),
        record.buyer_address.clone(),
        record.tax_info.clone(),
        record.tax_office_registration_number.clone(),
        record.phone.clone(),
        record.tax_office_name.clone(),
        record.tax_registration_number.clone(),
        join_decimals(&record.quantities),
        record.descriptions.join("; "),
        record.units.join("; "),
        join_decimals(&record.amounts),
        optional_decimal(record.subtotal),
        optional_decimal(record.tax_amount),
        optional_decimal(record.grand_total),
        record.amount_in_words.clone(),
    ]
}

fn join_decimals(values: &[Decimal]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn optional_decimal(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(FIELD_NAMES)?;
    wtr.write_record(record_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", record.invoice_number));
    output.push_str(&format!("Date: {}\n", record.invoice_date));
    output.push('\n');

    output.push_str("Buyer:\n");
    output.push_str(&format!("  {}\n", record.buyer_name));
    if !record.buyer_address.is_empty() {
        output.push_str(&format!("  {}\n", record.buyer_address));
    }
    if !record.phone.is_empty() {
        output.push_str(&format!("  Tel: {}\n", record.phone));
    }
    if !record.tax_office_name.is_empty() {
        output.push_str(&format!("  Tax office: {}\n", record.tax_office_name));
    }
    if !record.tax_office_registration_number.is_empty() {
        output.push_str(&format!("  Tax number: {}\n", record.tax_office_registration_number));
    }
    output.push('\n');

    if record.item_count() > 0 {
        output.push_str("Items:\n");
        for item in record.line_items() {
            output.push_str(&format!(
                "  {} x {} {}  {} ₺\n",
                item.quantity,
                item.unit,
                item.description,
                format_turkish_amount(item.amount)
            ));
        }
        output.push('\n');
    }

    let amount = |value: Option<Decimal>| {
        value
            .map(|v| format!("{} ₺", format_turkish_amount(v)))
            .unwrap_or_else(|| "-".to_string())
    };

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", amount(record.subtotal)));
    output.push_str(&format!("  Tax:      {}\n", amount(record.tax_amount)));
    output.push_str(&format!("  Total:    {}\n", amount(record.grand_total)));

    if !record.amount_in_words.is_empty() {
        output.push_str(&format!("\nIn words: {}\n", record.amount_in_words));
    }

    output
}
