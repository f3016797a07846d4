//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract_invoice, ExtractionResult, InvoiceParser, RuleBasedParser};
