//! Canonicalization of raw OCR text.
//!
//! The pipeline is NFKC, currency unification, OCR confusion substitution
//! and whitespace collapsing. Every step is a pure function of its input and
//! the whole pipeline is idempotent.

use unicode_normalization::UnicodeNormalization;

use super::patterns::{CURRENCY_ALIASES, CURRENCY_GAP, HORIZONTAL_WHITESPACE};

/// Normalize raw OCR text. Empty or blank input yields an empty string.
pub fn normalize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let composed: String = raw.nfkc().collect();
    let composed = composed.replace("\r\n", "\n").replace('\r', "\n");

    // Currency first: a run followed by `TL` must see the same neighbour
    // (`₺`) on every pass.
    let unified = CURRENCY_ALIASES.replace_all(&composed, "${1}₺");
    let unified = CURRENCY_GAP.replace_all(&unified, "₺${1}");

    let substituted = substitute_confusables(&unified);

    HORIZONTAL_WHITESPACE.replace_all(&substituted, " ").into_owned()
}

/// Split normalized text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn punctuation_substitute(c: char) -> Option<char> {
    match c {
        '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE58}' => Some('-'),
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '`' => Some('\''),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' => Some('"'),
        _ => None,
    }
}

fn digit_substitute(c: char) -> Option<char> {
    match c {
        'O' | 'o' => Some('0'),
        'I' | 'l' | '|' => Some('1'),
        'S' => Some('5'),
        'B' => Some('8'),
        _ => None,
    }
}

fn is_numeric_run_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ',' || digit_substitute(c).is_some()
}

/// Apply the confusion table in one pass over the original characters.
///
/// Letter-to-digit rewrites only happen inside a numeric run: a maximal
/// run of digits, confusable letters and `.`/`,` whose first
/// non-separator character is a real digit and which is not glued to a
/// following letter (`10lt` stays a quantity with a unit).
fn substitute_confusables(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !is_numeric_run_char(c) {
            out.push(punctuation_substitute(c).unwrap_or(c));
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && is_numeric_run_char(chars[i]) {
            i += 1;
        }
        let run = &chars[start..i];

        let digit_led = run
            .iter()
            .find(|c| **c != '.' && **c != ',')
            .is_some_and(|c| c.is_ascii_digit());
        let glued_to_word = chars.get(i).is_some_and(|c| c.is_alphabetic());
        let rewrite = digit_led && !glued_to_word;

        for &rc in run {
            match digit_substitute(rc) {
                Some(digit) if rewrite => out.push(digit),
                _ => out.push(rc),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("  \n\t "), "");
    }

    #[test]
    fn test_confusables_inside_numbers() {
        assert_eq!(normalize_text("Tutar 1O.OOO,OO"), "Tutar 10.000,00");
        assert_eq!(normalize_text("2O2l yılı"), "2021 yılı");
        assert_eq!(normalize_text("5S,BO"), "55,80");
    }

    #[test]
    fn test_words_are_left_alone() {
        assert_eq!(normalize_text("Fatura No: ABC2024"), "Fatura No: ABC2024");
        assert_eq!(normalize_text("SUBTOTAL"), "SUBTOTAL");
        assert_eq!(normalize_text("No1234"), "No1234");
        assert_eq!(normalize_text("10lt su"), "10lt su");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(normalize_text("A\u{2013}B \u{201C}x\u{201D} it\u{2019}s"), "A-B \"x\" it's");
    }

    #[test]
    fn test_currency_unification() {
        assert_eq!(normalize_text("6.845 TL"), "6.845 ₺");
        assert_eq!(normalize_text("TL 1.000,00"), "₺1.000,00");
        assert_eq!(normalize_text("50,00TL"), "50,00₺");
        assert_eq!(normalize_text("1.200 YTL ve 300 TRY"), "1.200 ₺ ve 300 ₺");
        assert_eq!(normalize_text("ATLAS"), "ATLAS");
    }

    #[test]
    fn test_confusables_before_currency_suffix() {
        assert_eq!(normalize_text("Tutar 1O,TL"), "Tutar 10,₺");
        assert_eq!(normalize_text("TL 1O,OO"), "₺10,00");
        assert_eq!(normalize_text("1OTL"), "1OTL");
    }

    #[test]
    fn test_whitespace_collapse_keeps_lines() {
        assert_eq!(
            normalize_text("Widget  A\t\t2 ADET\r\nKDV\u{00a0} 18,00"),
            "Widget A 2 ADET\nKDV 18,00"
        );
    }

    #[test]
    fn test_compatibility_forms() {
        // Fullwidth digits and ligatures
        assert_eq!(normalize_text("\u{FF11}\u{FF12}\u{FF13}"), "123");
        assert_eq!(normalize_text("\u{FB01}yat"), "fiyat");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "FATURA\nFatura No : GIB2O24OOOOOOO12\nTarih: 29 Ağu 2025",
            "ARA TOPLAM  ₺ 1.OOO,OO\nKDV %18   18O,OO TL",
            "Widget A  2 ADET  50,00\r\n\r\nSayın  ALİ VELİ",
            "l0,5 | 1l | S5 — “quoted” ‘x’",
            "Tutar 1O,TL",
            "5O TRY 1OYTL lOTL",
            "",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(" a \n\n  \n b"), vec!["a", "b"]);
    }
}
