//! Date parsing for Turkish invoices.

use unicode_normalization::UnicodeNormalization;

use super::patterns::{DATE_NAMED, DATE_NUMERIC};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Finds date-shaped substrings and yields them in canonical `YYYY-MM-DD` form.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // "29 Ağustos 2025", only when the middle word is a known month
        for caps in DATE_NAMED.captures_iter(text) {
            if let Some(month) = month_number(&caps[2]) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(canonical(&caps[3], month, &caps[1]), full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // DD.MM.YYYY, DD/MM/YYYY, DD-MM-YYYY
        for caps in DATE_NUMERIC.captures_iter(text) {
            let full_match = caps.get(0).unwrap();
            let month: u32 = caps[2].parse().unwrap_or(0);
            results.push(
                ExtractionMatch::new(canonical(&caps[3], month, &caps[1]), full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results.sort_by_key(|m| m.position.map(|(start, _)| start));
        results
    }
}

/// Locate the first date-shaped substring of `text`.
pub fn find_date(text: &str) -> Option<ExtractionMatch<String>> {
    DateExtractor::new().extract(text)
}

/// Parse a date fragment into `YYYY-MM-DD`.
///
/// Tries `<day> <month name> <year>` first, then `<day><sep><month><sep><year>`.
/// Unrecognized input comes back trimmed but otherwise unchanged.
pub fn parse_date(text: &str) -> String {
    let trimmed = text.trim();

    let named = DATE_NAMED.captures_iter(trimmed).find_map(|caps| {
        month_number(&caps[2]).map(|month| canonical(&caps[3], month, &caps[1]))
    });
    if let Some(date) = named {
        return date;
    }

    if let Some(caps) = DATE_NUMERIC.captures(trimmed) {
        let month: u32 = caps[2].parse().unwrap_or(0);
        return canonical(&caps[3], month, &caps[1]);
    }

    trimmed.to_string()
}

fn canonical(year: &str, month: u32, day: &str) -> String {
    let day: u32 = day.parse().unwrap_or(0);
    format!("{}-{:02}-{:02}", year, month, day)
}

/// Map a localized month name or abbreviation to its number.
///
/// Accepts Turkish names with and without diacritics, Turkish and English
/// 3-letter abbreviations, and full English names, in any case.
pub fn month_number(token: &str) -> Option<u32> {
    let folded: String = token
        .nfkc()
        .flat_map(char::to_lowercase)
        // `İ` lowercases to `i` + U+0307
        .filter(|c| *c != '\u{307}')
        .collect();
    let folded = folded.trim_end_matches('.');

    let month = match folded {
        "ocak" | "oca" | "january" | "jan" => 1,
        "şubat" | "subat" | "şub" | "sub" | "february" | "feb" => 2,
        "mart" | "mar" | "march" => 3,
        "nisan" | "nis" | "april" | "apr" => 4,
        "mayıs" | "mayis" | "may" => 5,
        "haziran" | "haz" | "june" | "jun" => 6,
        "temmuz" | "tem" | "july" | "jul" => 7,
        "ağustos" | "agustos" | "ağu" | "agu" | "august" | "aug" => 8,
        "eylül" | "eylul" | "eyl" | "september" | "sep" | "sept" => 9,
        "ekim" | "eki" | "october" | "oct" => 10,
        "kasım" | "kasim" | "kas" | "november" | "nov" => 11,
        "aralık" | "aralik" | "ara" | "december" | "dec" => 12,
        _ => return None,
    };

    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_month() {
        assert_eq!(parse_date("29 Ağu 2025"), "2025-08-29");
        assert_eq!(parse_date("1 Ocak 2024"), "2024-01-01");
        assert_eq!(parse_date("05 EYLÜL 2023"), "2023-09-05");
        assert_eq!(parse_date("12 KASIM 2022"), "2022-11-12");
        assert_eq!(parse_date("3 March 2021"), "2021-03-03");
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_date("01.11.2021"), "2021-11-01");
        assert_eq!(parse_date("1/2/2024"), "2024-02-01");
        assert_eq!(parse_date(" 15-01-2024 "), "2024-01-15");
    }

    #[test]
    fn test_unknown_month_falls_through_to_numeric() {
        assert_eq!(parse_date("12 Adet 2024 teslim 01.02.2024"), "2024-02-01");
    }

    #[test]
    fn test_unparsed_passthrough() {
        assert_eq!(parse_date("not a date"), "not a date");
        assert_eq!(parse_date("  15.01.24 "), "15.01.24");
    }

    #[test]
    fn test_month_number_turkish_case() {
        assert_eq!(month_number("EKİM"), Some(10));
        assert_eq!(month_number("ŞUBAT"), Some(2));
        assert_eq!(month_number("Ara."), Some(12));
        assert_eq!(month_number("Adet"), None);
    }

    #[test]
    fn test_extractor_finds_first_date_in_line() {
        let extractor = DateExtractor::new();

        let found = extractor.extract("Fatura Tarihi: 29 Ağu 2025 Saat 10:30").unwrap();
        assert_eq!(found.value, "2025-08-29");
        assert_eq!(found.source, "29 Ağu 2025");

        let all = extractor.extract_all("Vade 30.09.2025, düzenleme 1 Eylül 2025");
        let values: Vec<&str> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["2025-09-30", "2025-09-01"]);

        assert!(extractor.extract("Toplam 1.000,00").is_none());
    }

    #[test]
    fn test_find_date_skips_unknown_month_words() {
        assert!(find_date("12 Adet 2024").is_none());
        assert_eq!(find_date("Tarih: 01.11.2021").unwrap().source, "01.11.2021");
    }
}
