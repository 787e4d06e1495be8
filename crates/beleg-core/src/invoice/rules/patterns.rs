//! Fixed regex patterns for German invoice text and LLM responses.

use lazy_static::lazy_static;
use regex::Regex;

/// Decimal-looking token as printed on invoices (`2`, `45,00`, `1.056,50`).
pub const NUMBER_TOKEN: &str = r"\d+(?:[.,]\d+)*";

/// Price token with exactly two fractional digits.
pub const PRICE_TOKEN: &str = r"\d{1,3}(?:\.\d{3})+,\d{2}|\d+[.,]\d{2}";

lazy_static! {
    // Dates: DD.MM.YYYY or DD.MM.YY
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(0[1-9]|[12][0-9]|3[01])\.(0[1-9]|1[012])\.(?:19|20)?\d\d\b"
    ).unwrap();

    // Grand total of the known vendor template, e.g. "SUMME 343,91" or "SUMME 1.234,56"
    pub static ref SUM_ANCHOR: Regex = Regex::new(
        r"SUMME\s+(\d{1,3}(?:\.\d{3})+,\d{2}|\d+[,.]\d+)"
    ).unwrap();

    // German amount with optional currency on either side
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?:(?:€|EUR|Euro)\s*)?\b(?:\d{1,3}(?:\.\d{3})+|\d+),\d{2}\b(?:\s*(?:€|EUR|Euro))?"
    ).unwrap();

    // Markdown code fence markers around LLM output
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"```(?:json|JSON)?"
    ).unwrap();

    // Most likely JSON object in an LLM response
    pub static ref JSON_CANDIDATE: Regex = Regex::new(
        r#"(?s)\{.*?"lieferant".*?"datum".*?"positionen".*\}"#
    ).unwrap();

    // Locale numbers inside JSON string values of numeric keys
    pub static ref JSON_GERMAN_THOUSANDS: Regex = Regex::new(
        r#""(gesamtbetrag|einzelpreis|gesamtpreis|menge)":\s*"(\d{1,3}(?:\.\d{3})+),(\d{2})(\s*€?)""#
    ).unwrap();

    pub static ref JSON_GERMAN_DECIMAL: Regex = Regex::new(
        r#""(gesamtbetrag|einzelpreis|gesamtpreis|menge)":\s*"(\d+),(\d{2})(\s*€?)""#
    ).unwrap();

    pub static ref JSON_US_THOUSANDS: Regex = Regex::new(
        r#""(gesamtbetrag|einzelpreis|gesamtpreis|menge)":\s*"(\d{1,3}(?:,\d{3})+)\.(\d{2})(\s*€?)""#
    ).unwrap();

    // Single-field captures over (possibly invalid) JSON text
    pub static ref JSON_LIEFERANT: Regex = Regex::new(
        r#""lieferant":\s*"([^"]+)""#
    ).unwrap();

    pub static ref JSON_DATUM: Regex = Regex::new(
        r#""datum":\s*"([^"]+)""#
    ).unwrap();

    pub static ref JSON_GESAMTBETRAG: Regex = Regex::new(
        r#""gesamtbetrag":\s*"([^"]+)""#
    ).unwrap();

    pub static ref JSON_RECHNUNGSNUMMER: Regex = Regex::new(
        r#""rechnungsnummer":\s*"([^"]+)""#
    ).unwrap();

    pub static ref JSON_POSITION: Regex = Regex::new(
        r#"\{\s*"beschreibung":\s*"([^"]+)",\s*"menge":\s*"([^"]+)",\s*"einzelpreis":\s*"([^"]+)",\s*"gesamtpreis":\s*"([^"]+)"\s*\}"#
    ).unwrap();

    // Labeled header fields in LLM prose
    pub static ref PROSE_DATE: Regex = Regex::new(
        r"(?i)(?:rechnungsdatum|datum|date):\s*(\d{1,2}[.-]\d{1,2}[.-]\d{2,4})"
    ).unwrap();

    pub static ref PROSE_AMOUNT: Regex = Regex::new(
        r"(?i)(?:gesamtbetrag|summe|total):\s*([0-9.]+,\d{2}|\d+[,.]\d{2})(?:\s*€|\s*EUR)?"
    ).unwrap();

    pub static ref PROSE_SUPPLIER: Regex = Regex::new(
        r"(?i)(?:lieferant|absender|firma|company):[ \t]*([^\n]+)"
    ).unwrap();

    // "POSITIONEN:" block and its numbered rows
    pub static ref POSITIONS_BLOCK: Regex = Regex::new(
        r"(?s)POSITIONEN:[ \t]*\r?\n(.*?)(?:\r?\n[ \t]*\r?\n|$)"
    ).unwrap();

    pub static ref POSITION_ROW: Regex = Regex::new(
        r"(?m)^\s*\d+\.\s+(.+?),?\s+(\d+(?:[.,]\d+)?)\s*[×xX]\s*(\d+(?:[,.]\d+)?)\s*€?\s*=\s*(\d+(?:[,.]\d+)?)\s*€?"
    ).unwrap();

    // Generic table row: [pos] description quantity unit_price total_price
    pub static ref GENERIC_ROW: Regex = Regex::new(&format!(
        r"^\s*(?:\d{{1,3}}[.)]?\s+)?(\p{{L}}[^\d]*?)\s+(\d+(?:[.,]\d+)?)\s+({price})\s*€?\s+({price})\s*€?\s*$",
        price = PRICE_TOKEN
    )).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_pattern() {
        assert!(DATE_DMY.is_match("15.02.2023"));
        assert!(DATE_DMY.is_match("15.02.23"));
        assert!(!DATE_DMY.is_match("32.01.2023"));
        assert!(!DATE_DMY.is_match("15.13.2023"));
        assert_eq!(DATE_DMY.find("am 01.12.2024 fällig").unwrap().as_str(), "01.12.2024");
    }

    #[test]
    fn test_amount_pattern() {
        assert_eq!(AMOUNT_PATTERN.find("Gesamt 1.056,50 €").unwrap().as_str(), "1.056,50 €");
        assert_eq!(AMOUNT_PATTERN.find("EUR 343,91").unwrap().as_str(), "EUR 343,91");
        assert_eq!(AMOUNT_PATTERN.find("Preis: 1234,56").unwrap().as_str(), "1234,56");
        assert!(AMOUNT_PATTERN.find("Menge 12").is_none());
    }

    #[test]
    fn test_json_candidate_spans_to_last_brace() {
        let text = r#"Hier: {"lieferant": "A", "datum": "1", "positionen": [{"x": 1}]} Ende"#;
        let candidate = JSON_CANDIDATE.find(text).unwrap().as_str();
        assert!(candidate.starts_with('{'));
        assert!(candidate.ends_with("}]}"));
    }

    #[test]
    fn test_position_row() {
        let caps = POSITION_ROW.captures("1. Ölwechsel, 2 x 45,00 € = 90,00 €").unwrap();
        assert_eq!(&caps[1], "Ölwechsel");
        assert_eq!(&caps[2], "2");
        assert_eq!(&caps[3], "45,00");
        assert_eq!(&caps[4], "90,00");
    }

    #[test]
    fn test_generic_row() {
        let caps = GENERIC_ROW
            .captures("1     Produkt A                      2         59,99 €         119,98 €")
            .unwrap();
        assert_eq!(&caps[1], "Produkt A");
        assert_eq!(&caps[2], "2");
        assert_eq!(&caps[3], "59,99");
        assert_eq!(&caps[4], "119,98");
    }
}
