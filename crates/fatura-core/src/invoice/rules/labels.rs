//! Label-anchored amount lookup ("ARA TOPLAM 1.000,00").

use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::{amount_tokens, parse_amount};

/// Find the amount belonging to the first line that matches any of `labels`.
///
/// The last amount on the label line wins, since rates or counts often sit
/// between a label and its amount. A label line without an amount takes the
/// last amount of the following line. Scanning stops at the first label
/// line either way.
pub fn locate_labeled_amount(lines: &[&str], labels: &[&Regex]) -> Option<Decimal> {
    let index = lines
        .iter()
        .position(|line| labels.iter().any(|label| label.is_match(line)))?;

    let token = amount_tokens(lines[index])
        .last()
        .map(|m| m.as_str())
        .or_else(|| {
            lines
                .get(index + 1)
                .and_then(|next| amount_tokens(next).last().map(|m| m.as_str()))
        })?;

    trace!("label line {} resolved to amount token {:?}", index, token);
    parse_amount(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::patterns::{GRAND_TOTAL_LABEL, SUBTOTAL_LABEL, TAX_LABEL};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_locates_each_total() {
        let lines = ["ARA TOPLAM 1.000,00", "KDV 180,00", "GENEL TOPLAM 1.180,00"];

        assert_eq!(locate_labeled_amount(&lines, &[&*SUBTOTAL_LABEL]), Some(dec("1000.00")));
        assert_eq!(locate_labeled_amount(&lines, &[&*TAX_LABEL]), Some(dec("180.00")));
        assert_eq!(locate_labeled_amount(&lines, &[&*GRAND_TOTAL_LABEL]), Some(dec("1180.00")));
    }

    #[test]
    fn test_takes_last_amount_on_line() {
        let lines = ["Hesaplanan KDV (%18) 18 180,00"];
        assert_eq!(locate_labeled_amount(&lines, &[&*TAX_LABEL]), Some(dec("180.00")));
    }

    #[test]
    fn test_falls_back_to_next_line_only() {
        let lines = ["Genel Toplam", "₺1.180,00", "2.000,00"];
        assert_eq!(locate_labeled_amount(&lines, &[&*GRAND_TOTAL_LABEL]), Some(dec("1180.00")));

        let lines = ["Genel Toplam", "teşekkürler", "1.180,00"];
        assert_eq!(locate_labeled_amount(&lines, &[&*GRAND_TOTAL_LABEL]), None);
    }

    #[test]
    fn test_stops_at_first_label_line() {
        let lines = ["KDV", "dahildir", "KDV 180,00"];
        assert_eq!(locate_labeled_amount(&lines, &[&*TAX_LABEL]), None);
    }

    #[test]
    fn test_missing_label() {
        let lines = ["Widget 50,00"];
        assert_eq!(locate_labeled_amount(&lines, &[&*SUBTOTAL_LABEL, &*TAX_LABEL]), None);
        assert_eq!(locate_labeled_amount(&[], &[&*TAX_LABEL]), None);
    }
}
