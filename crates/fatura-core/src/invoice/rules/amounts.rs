//! Amount parsing for Turkish invoices.

use std::str::FromStr;

use regex::Match;
use rust_decimal::{Decimal, RoundingStrategy};

use super::patterns::AMOUNT_TOKEN;

/// Find amount-shaped substrings in a line, left to right.
///
/// Tokens touching a `%` sign are rates, not amounts, and are skipped.
pub fn amount_tokens(line: &str) -> Vec<Match<'_>> {
    AMOUNT_TOKEN
        .find_iter(line)
        .filter(|m| {
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            before != Some('%') && after != Some('%')
        })
        .collect()
}

/// Round to two fraction digits and pin the scale to 2.
pub fn round_amount(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Sum of `values`, or `None` when it does not fit in a `Decimal`.
pub fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}

/// Parse a locale-ambiguous amount such as `₺116.000,00`, `6.845 TL` or `1234.56`.
///
/// When both `.` and `,` appear, the one occurring last is the decimal
/// separator and the other is grouping. A lone separator kind is grouping
/// when it repeats; a single `.` followed by exactly three digits is
/// Turkish thousands grouping.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(dot), None) => {
            let grouping = cleaned.matches('.').count() > 1 || cleaned[dot + 1..].len() == 3;
            if grouping {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    let normalized = normalized.trim_end_matches('.');
    Decimal::from_str(normalized).ok().map(round_amount)
}

/// Format an amount in Turkish style (1.234,56).
pub fn format_turkish_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
