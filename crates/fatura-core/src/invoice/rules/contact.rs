//! Phone number extraction.

use super::patterns::{PHONE_LABELED, PHONE_STANDALONE};
use super::{ExtractionMatch, FieldExtractor};

/// Turkish phone number extractor.
///
/// Prefers numbers after a `Tel`/`GSM`/`Phone` label, then bare numbers in
/// Turkish landline or mobile shape.
pub struct PhoneExtractor;

impl PhoneExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in [&*PHONE_LABELED, &*PHONE_STANDALONE] {
            for caps in pattern.captures_iter(text) {
                let Some(number) = caps.get(1) else {
                    continue;
                };
                let value = number.as_str().trim();
                if results.iter().any(|m: &ExtractionMatch<String>| m.value == value) {
                    continue;
                }
                results.push(
                    ExtractionMatch::new(value.to_string(), number.as_str())
                        .with_position(number.start(), number.end()),
                );
            }
        }

        results
    }
}

/// Keep only ASCII digits.
pub fn digits_of(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}
