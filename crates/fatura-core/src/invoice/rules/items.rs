//! Line-item recovery from the item table of an invoice.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::amounts::{amount_tokens, parse_amount};
use super::patterns::{
    DESCRIPTION_CUTOFF, HORIZONTAL_WHITESPACE, ITEMS_START, QUANTITY_BEFORE_UNIT,
    QUANTITY_LABELED, TOTALS_START,
};
use crate::models::invoice::{LineItem, DEFAULT_UNIT, PLACEHOLDER_DESCRIPTION};

/// Defaults applied to recovered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOptions {
    /// Unit assigned to every item.
    pub default_unit: String,
    /// Description used when none can be recovered.
    pub placeholder_description: String,
}

impl Default for ItemOptions {
    fn default() -> Self {
        Self {
            default_unit: DEFAULT_UNIT.to_string(),
            placeholder_description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }
}

/// Recover line items from trimmed, non-empty lines.
///
/// The block starts after the first item header line (or at the top when
/// there is none) and ends before the first totals line. Every block line
/// with an amount-shaped token becomes a candidate item priced at its last
/// token. Items are deduplicated on `(description, amount)`, keeping
/// first-seen order.
pub fn extract_line_items(lines: &[&str], options: &ItemOptions) -> Vec<LineItem> {
    let start = lines
        .iter()
        .position(|line| ITEMS_START.is_match(line))
        .map_or(0, |header| header + 1);
    let end = lines[start.min(lines.len())..]
        .iter()
        .position(|line| TOTALS_START.is_match(line))
        .map_or(lines.len(), |offset| start + offset);

    debug!("item block spans lines {}..{}", start, end);

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for idx in start..end {
        let line = lines[idx];
        let tokens = amount_tokens(line);
        let Some(last) = tokens.last() else {
            continue;
        };

        let Some(amount) = parse_amount(last.as_str()) else {
            trace!("discarding line {} with unparseable amount {:?}", idx, last.as_str());
            continue;
        };

        let mut description = describe(line);
        // The line above the block is a header, never a description.
        if description.is_empty() && idx > start && amount_tokens(lines[idx - 1]).is_empty() {
            description = lines[idx - 1].trim().to_string();
        }
        if description.is_empty() {
            description = options.placeholder_description.clone();
        }

        let quantity = find_quantity(lines, idx, start, end).unwrap_or(Decimal::ONE);

        if !seen.insert((description.clone(), amount)) {
            trace!("skipping duplicate item {:?} {}", description, amount);
            continue;
        }

        items.push(LineItem {
            quantity,
            description,
            unit: options.default_unit.clone(),
            amount,
        });
    }

    debug!("recovered {} line items", items.len());
    items
}

/// Strip amounts and everything from the first unit/rate keyword onward.
fn describe(line: &str) -> String {
    let mut text = String::with_capacity(line.len());
    let mut cursor = 0;
    for token in amount_tokens(line) {
        text.push_str(&line[cursor..token.start()]);
        text.push(' ');
        cursor = token.end();
    }
    text.push_str(&line[cursor..]);

    let cut = DESCRIPTION_CUTOFF
        .find(&text)
        .map_or(text.as_str(), |m| &text[..m.start()]);

    HORIZONTAL_WHITESPACE
        .replace_all(cut, " ")
        .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c == '₺')
        .to_string()
}

/// Quantity for the item on line `idx`.
///
/// The item line itself may carry a labelled quantity or a count before a
/// unit (`2 ADET`). Neighbouring lines inside the block only contribute a
/// labelled quantity, so counts of adjacent items are not borrowed.
fn find_quantity(lines: &[&str], idx: usize, start: usize, end: usize) -> Option<Decimal> {
    let line = lines[idx];
    let own = QUANTITY_LABELED
        .captures(line)
        .or_else(|| QUANTITY_BEFORE_UNIT.captures(line))
        .and_then(|caps| parse_quantity(&caps[1]));
    if own.is_some() {
        return own;
    }

    let previous = idx.checked_sub(1).filter(|&i| i >= start);
    let next = Some(idx + 1).filter(|&i| i < end);

    [previous, next]
        .into_iter()
        .flatten()
        .find_map(|i| QUANTITY_LABELED.captures(lines[i]).and_then(|caps| parse_quantity(&caps[1])))
}

fn parse_quantity(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.replace(',', "."))
        .ok()
        .map(|q| q.normalize())
        .filter(|q| !q.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn extract(lines: &[&str]) -> Vec<LineItem> {
        extract_line_items(lines, &ItemOptions::default())
    }

    #[test]
    fn test_duplicate_lines_collapse() {
        let items = extract(&["Widget A  2 ADET  50,00", "Widget A  2 ADET  50,00"]);
        assert_eq!(
            items,
            vec![LineItem::new("Widget A", dec("50.00")).with_quantity(dec("2"))]
        );
    }

    #[test]
    fn test_lines_without_digits_are_skipped() {
        assert!(extract(&["Teşekkür ederiz", "İyi günler"]).is_empty());
        assert!(extract(&[]).is_empty());
    }

    #[test]
    fn test_block_between_header_and_totals() {
        let lines = [
            "Fatura No: A-2024-17",
            "Açıklama Miktar Birim Fiyat Tutar",
            "Danışmanlık Hizmeti 1 ADET 1.000,00 1.000,00",
            "Kargo 2 ADET 25,00 50,00",
            "ARA TOPLAM 1.050,00",
            "KDV %20 210,00",
        ];
        let items = extract(&lines);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Danışmanlık Hizmeti");
        assert_eq!(items[0].quantity, dec("1"));
        assert_eq!(items[0].amount, dec("1000.00"));
        assert_eq!(items[1].description, "Kargo");
        assert_eq!(items[1].quantity, dec("2"));
        assert_eq!(items[1].amount, dec("50.00"));
        assert!(items.iter().all(|i| i.unit == "ADET"));
    }

    #[test]
    fn test_two_line_item() {
        let lines = ["Ürün", "Yazılım lisansı", "₺4.500,00", "Toplam ₺4.500,00"];
        let items = extract(&lines);

        assert_eq!(items, vec![LineItem::new("Yazılım lisansı", dec("4500.00"))]);
    }

    #[test]
    fn test_placeholder_when_nothing_describes_item() {
        let lines = ["Ürün", "1.500,00"];
        let items = extract(&lines);

        assert_eq!(items, vec![LineItem::new("Item", dec("1500.00"))]);
    }

    #[test]
    fn test_labelled_quantity_on_next_line() {
        let lines = ["Açıklama", "Kablo 120,00", "Miktar: 3", "TOPLAM 120,00"];
        let items = extract(&lines);

        assert_eq!(
            items,
            vec![
                LineItem::new("Kablo", dec("120.00")).with_quantity(dec("3")),
                LineItem::new("Item", dec("3.00")).with_quantity(dec("3")),
            ]
        );
    }

    #[test]
    fn test_count_only_line_is_an_item() {
        let items = extract(&["Kalem 5 ADET"]);
        assert_eq!(
            items,
            vec![LineItem::new("Kalem", dec("5.00")).with_quantity(dec("5"))]
        );
    }

    #[test]
    fn test_description_fallback_stays_inside_block() {
        // Header above the first block line is not borrowed
        let items = extract(&["Ürün Açıklaması", "₺120,00"]);
        assert_eq!(items, vec![LineItem::new("Item", dec("120.00"))]);

        // Without a header the block starts at the top
        let items = extract(&["Kablo seti", "₺120,00"]);
        assert_eq!(items, vec![LineItem::new("Kablo seti", dec("120.00"))]);
    }

    #[test]
    fn test_custom_options() {
        let options = ItemOptions {
            default_unit: "PCS".to_string(),
            placeholder_description: "Kalem".to_string(),
        };
        let items = extract_line_items(&["Items", "99,90"], &options);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit, "PCS");
        assert_eq!(items[0].description, "Kalem");
    }

    #[test]
    fn test_same_description_different_amount_kept() {
        let items = extract(&["Widget 10,00", "Widget 12,00"]);
        assert_eq!(items.len(), 2);
    }
}
