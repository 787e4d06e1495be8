//! Field-by-field regex capture over text that may not be valid JSON.

use regex::Regex;
use tracing::debug;

use crate::invoice::rules::patterns::{
    JSON_DATUM, JSON_GESAMTBETRAG, JSON_LIEFERANT, JSON_POSITION, JSON_RECHNUNGSNUMMER,
};
use crate::models::invoice::{InvoiceDraft, LineItem};

/// Capture `lieferant`, `datum`, `gesamtbetrag`, `rechnungsnummer` and
/// complete `positionen` entries from JSON-ish text.
///
/// Each field is captured independently, so one malformed value does not
/// hide the others. Amounts get `currency_suffix` appended.
pub fn capture_json_values(json_text: &str, currency_suffix: &str) -> InvoiceDraft {
    let line_items: Vec<LineItem> = JSON_POSITION
        .captures_iter(json_text)
        .map(|caps| {
            LineItem::from_raw(
                &caps[1],
                &caps[2],
                with_currency(&caps[3], currency_suffix),
                with_currency(&caps[4], currency_suffix),
            )
        })
        .collect();

    let draft = InvoiceDraft {
        supplier: capture(&JSON_LIEFERANT, json_text),
        date: capture(&JSON_DATUM, json_text),
        amount: capture(&JSON_GESAMTBETRAG, json_text).map(|a| with_currency(&a, currency_suffix)),
        invoice_number: capture(&JSON_RECHNUNGSNUMMER, json_text),
        line_items,
        ..Default::default()
    };

    debug!(
        "Captured supplier={} date={} amount={} positions={}",
        draft.supplier.is_some(),
        draft.date.is_some(),
        draft.amount.is_some(),
        draft.line_items.len()
    );

    draft
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Append the currency to a numeric-looking value that does not carry it yet.
pub(crate) fn with_currency(value: &str, currency_suffix: &str) -> String {
    let value = value.trim();
    if currency_suffix.is_empty()
        || value.contains(currency_suffix)
        || !value.chars().any(|c| c.is_ascii_digit())
    {
        return value.to_string();
    }
    format!("{} {}", value, currency_suffix)
}
