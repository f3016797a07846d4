//! Common regex patterns for Turkish invoice extraction.
//!
//! Patterns run on normalized text, so currency abbreviations are already
//! folded into `₺` and horizontal whitespace is single-spaced. Turkish
//! dotless/dotted `ı`/`i` are spelled out as classes because `(?i)` uses
//! simple case folding, which does not map `I` to `ı`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalizer
    pub static ref CURRENCY_ALIASES: Regex = Regex::new(
        r"(^|[^\p{L}])(?:YTL|TRY|TL)\b"
    ).unwrap();

    pub static ref CURRENCY_GAP: Regex = Regex::new(
        r"₺[^\S\n]+(\d)"
    ).unwrap();

    pub static ref HORIZONTAL_WHITESPACE: Regex = Regex::new(
        r"[^\S\n]+"
    ).unwrap();

    // Amount-shaped substrings (currency optional, digit-led)
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"(?:₺ ?)?\d(?:[\d.,]*\d)?(?: ?₺)?"
    ).unwrap();

    // Dates
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_NAMED: Regex = Regex::new(
        r"\b(\d{1,2})\s+(\p{L}+)\.?,?\s+(\d{4})\b"
    ).unwrap();

    pub static ref INVOICE_DATE_LABEL: Regex = Regex::new(
        r"(?i)(?:fatura\s*tarih[iı]?|invoice\s*date|^\W*tarih[iı]?\b|^\W*date\b)"
    ).unwrap();

    pub static ref SIGNATURE_DATE_LABEL: Regex = Regex::new(
        r"(?i)(?:d[üu]zenle(?:n)?me\s*tarih[iı]?|[iİı]mza\s*tarih[iı]?|signature\s*date|signed\s*on)"
    ).unwrap();

    // Invoice number
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:fatura\s*(?:no|numaras[ıi])|belge\s*no|seri\s*s[ıi]ra\s*no|invoice\s*(?:no|number))\b\.?\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9/_\-]*)"
    ).unwrap();

    pub static ref E_INVOICE_NUMBER: Regex = Regex::new(
        r"\b([A-Z0-9]{3}20\d{2}\d{9})\b"
    ).unwrap();

    // Buyer
    pub static ref BUYER_LABEL: Regex = Regex::new(
        r"(?i)^\W*(?:say[ıi]n|al[ıi]c[ıi](?:n[ıi]n)?(?:\s*ad[ıi])?(?:\s*/?\s*[üu]nvan[ıi])?|buyer|bill\s*to)\b\s*[:.]?\s*(.*)$"
    ).unwrap();

    // Phone (Turkish formats)
    pub static ref PHONE_LABELED: Regex = Regex::new(
        r"(?i)\b(?:tel(?:efon)?|gsm|cep|phone)\b\.?\s*(?:no\b\.?)?\s*[:.]?\s*(\+?[\d(][\d\s()\-]{5,}\d)"
    ).unwrap();

    pub static ref PHONE_STANDALONE: Regex = Regex::new(
        r"(?:^|[^\d+])((?:\+90|0)?[\s\-]?\(?[2-5]\d{2}\)?[\s\-]?\d{3}[\s\-]?\d{2}[\s\-]?\d{2})(?:$|[^\d])"
    ).unwrap();

    // Tax office data
    pub static ref TAX_INFO_LINE: Regex = Regex::new(
        r"(?i)(?:vergi\s*kimlik|\bvkn\b|\btckn\b|\bvk\s*bilgisi)"
    ).unwrap();

    pub static ref TAX_OFFICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:v\.?\s*d\.?\s*h\.?\s*no|\bvkn|vergi\s*kimlik\s*no|vergi\s*no|\btckn)\b\.?\s*[:.]?\s*(\d{10,11})\b"
    ).unwrap();

    pub static ref TAX_OFFICE_NAME: Regex = Regex::new(
        r"(?i)(?:vergi\s*dairesi|ba[ğg]l[ıi]\s*oldu[ğg]u\s*v\.?\s*d\.?)\s*[:.]?\s*(\p{L}[\p{L} ]*)"
    ).unwrap();

    pub static ref TAX_REGISTRATION_NUMBER: Regex = Regex::new(
        r"(?i)(?:vergi\s*)?sicil\s*no\b\.?\s*[:.]?\s*(\d[\d\-]*\d|\d)"
    ).unwrap();

    // Amount in words ("Yalnız bin yüz seksen Türk Lirası")
    pub static ref AMOUNT_IN_WORDS: Regex = Regex::new(
        r"(?i)(?:yaln[ıi]z|yaz[ıi]\s*ile(?:\s*toplam)?)\s*[:#]?\s*(.+)$"
    ).unwrap();

    // Totals labels, anchored at line start so table headers do not match
    pub static ref SUBTOTAL_LABEL: Regex = Regex::new(
        r"(?i)^\W*(?:ara\s*toplam|mal\s*/?\s*hizmet\s*toplam|matrah|sub\s*-?\s*total)"
    ).unwrap();

    pub static ref TAX_LABEL: Regex = Regex::new(
        r"(?i)^\W*(?:toplam\s+)?(?:hesaplanan\s+)?(?:kdv|vat|tax)\b"
    ).unwrap();

    pub static ref GRAND_TOTAL_LABEL: Regex = Regex::new(
        r"(?i)^\W*(?:genel\s*toplam|[öo]denecek\s*tutar|vergiler\s*dahil\s*toplam|grand\s*total|total\s*due|toplam\s*tutar|toplam\s*[:₺\d]|total\s*[:₺\d])"
    ).unwrap();

    // Line-item block markers
    pub static ref ITEMS_START: Regex = Regex::new(
        r"(?i)\b(?:a[cç][ıi]klama|[üu]r[üu]n|mal\s*/\s*hizmet|hizmet|description|items?)\b"
    ).unwrap();

    pub static ref TOTALS_START: Regex = Regex::new(
        r"(?i)^\W*(?:ara\s*toplam|genel\s*toplam|toplam|hesaplanan|kdv|matrah|[öo]denecek|sub\s*-?\s*total|total|tax|vat)\b"
    ).unwrap();

    // Line-item fields
    pub static ref QUANTITY_LABELED: Regex = Regex::new(
        r"(?i)\b(?:miktar[ıi]?|qty|quantity|adet\s*[:=])\s*[:=]?\s*(\d+(?:[.,]\d+)?)"
    ).unwrap();

    pub static ref QUANTITY_BEFORE_UNIT: Regex = Regex::new(
        r"(?i)\b(\d+(?:[.,]\d+)?)\s*(?:adet|ad|pcs|pc|kg|gr|lt|litre|mt|metre|m2|paket|kutu|saat|ay|g[üu]n)\b"
    ).unwrap();

    pub static ref DESCRIPTION_CUTOFF: Regex = Regex::new(
        r"(?i)\b(?:adet|pcs|kg|gr|lt|litre|mt|metre|m2|paket|kutu|saat|miktar[ıi]?|qty|quantity|birim\s*fiyat[ıi]?|fiyat[ıi]?|kdv|vat|oran[ıi]?|rate)\b|%"
    ).unwrap();
}
