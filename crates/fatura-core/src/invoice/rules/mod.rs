//! Rule-based field extractors for Turkish invoices.

pub mod normalize;
pub mod amounts;
pub mod dates;
pub mod labels;
pub mod items;
pub mod contact;
pub mod patterns;

pub use normalize::{normalize_text, split_lines};
pub use amounts::{amount_tokens, checked_sum, parse_amount, round_amount, format_turkish_amount};
pub use dates::{find_date, parse_date, month_number, DateExtractor};
pub use labels::locate_labeled_amount;
pub use items::{extract_line_items, ItemOptions};
pub use contact::{PhoneExtractor, digits_of};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value recovered from a span of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
