//! Typed schema of the JSON object the model is asked to return.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::capture::with_currency;
use crate::models::invoice::{InvoiceDraft, LineItem};

/// Top-level invoice object.
///
/// Every field is optional. A value of the wrong type is treated as absent
/// rather than failing the whole parse; numbers are accepted as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LlmInvoicePayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub lieferant: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub datum: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rechnungsnummer: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gesamtbetrag: Option<String>,
    #[serde(default, deserialize_with = "lenient_positions")]
    pub positionen: Vec<LlmPosition>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rohtext: Option<String>,
}

/// One entry of `positionen`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LlmPosition {
    #[serde(default, deserialize_with = "lenient_text")]
    pub beschreibung: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub menge: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub einzelpreis: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gesamtpreis: Option<String>,
}

impl LlmPosition {
    fn is_empty(&self) -> bool {
        [&self.beschreibung, &self.menge, &self.einzelpreis, &self.gesamtpreis]
            .iter()
            .all(|field| field.is_none())
    }

    fn to_line_item(&self, currency_suffix: &str) -> LineItem {
        let price = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| with_currency(v, currency_suffix))
                .unwrap_or_default()
        };

        LineItem::from_raw(
            self.beschreibung.clone().unwrap_or_default(),
            self.menge.clone().unwrap_or_default(),
            price(&self.einzelpreis),
            price(&self.gesamtpreis),
        )
    }
}

impl LlmInvoicePayload {
    /// Overlay the non-empty fields of this payload on `draft`.
    ///
    /// Line items are replaced as a whole, and only when the payload carries
    /// at least one usable position.
    pub fn apply_to(&self, draft: &mut InvoiceDraft, currency_suffix: &str) {
        if let Some(supplier) = non_blank(&self.lieferant) {
            draft.supplier = Some(supplier.to_string());
        }
        if let Some(date) = non_blank(&self.datum) {
            draft.date = Some(date.to_string());
        }
        if let Some(amount) = non_blank(&self.gesamtbetrag) {
            draft.amount = Some(with_currency(amount, currency_suffix));
        }
        if let Some(number) = non_blank(&self.rechnungsnummer) {
            draft.invoice_number = Some(number.to_string());
        }
        if let Some(transcript) = non_blank(&self.rohtext) {
            draft.transcript = Some(transcript.to_string());
        }

        let items: Vec<LineItem> = self
            .positionen
            .iter()
            .filter(|position| !position.is_empty())
            .map(|position| position.to_line_item(currency_suffix))
            .collect();
        if !items.is_empty() {
            draft.line_items = items;
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_positions<'de, D>(deserializer: D) -> Result<Vec<LlmPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrong_types_become_absent() {
        let payload: LlmInvoicePayload = serde_json::from_str(
            r#"{"lieferant": ["A"], "datum": null, "gesamtbetrag": 56.5, "positionen": "keine"}"#,
        )
        .unwrap();

        assert_eq!(payload.lieferant, None);
        assert_eq!(payload.datum, None);
        assert_eq!(payload.gesamtbetrag.as_deref(), Some("56.5"));
        assert!(payload.positionen.is_empty());
    }

    #[test]
    fn test_non_object_positions_are_skipped() {
        let payload: LlmInvoicePayload = serde_json::from_str(
            r#"{"positionen": [1, "x", {"beschreibung": "Teil", "menge": 2}, {}]}"#,
        )
        .unwrap();

        assert_eq!(payload.positionen.len(), 2);
        assert_eq!(payload.positionen[0].menge.as_deref(), Some("2"));
        assert!(payload.positionen[1].is_empty());
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(serde_json::from_str::<LlmInvoicePayload>("[1, 2]").is_err());
    }

    #[test]
    fn test_apply_overlays_non_empty_fields() {
        let payload: LlmInvoicePayload = serde_json::from_str(
            r#"{"lieferant": "", "datum": "01.02.2024", "gesamtbetrag": "56.50",
                "positionen": [{"beschreibung": "Teil", "einzelpreis": "56.50"}]}"#,
        )
        .unwrap();

        let mut draft = InvoiceDraft {
            supplier: Some("Aus Regex".to_string()),
            line_items: vec![LineItem::from_raw("Alt", "1", "1", "1")],
            ..Default::default()
        };
        payload.apply_to(&mut draft, "€");

        assert_eq!(draft.supplier.as_deref(), Some("Aus Regex"));
        assert_eq!(draft.date.as_deref(), Some("01.02.2024"));
        assert_eq!(draft.amount.as_deref(), Some("56.50 €"));
        assert_eq!(draft.line_items.len(), 1);
        assert_eq!(draft.line_items[0].description, "Teil");
        assert_eq!(draft.line_items[0].unit_price_raw, "56.50 €");
        assert_eq!(draft.line_items[0].total_price_raw, "");
    }

    #[test]
    fn test_empty_positions_keep_existing_items() {
        let payload: LlmInvoicePayload =
            serde_json::from_str(r#"{"positionen": [{}]}"#).unwrap();

        let mut draft = InvoiceDraft {
            line_items: vec![LineItem::from_raw("Alt", "1", "1", "1")],
            ..Default::default()
        };
        payload.apply_to(&mut draft, "€");

        assert_eq!(draft.line_items[0].description, "Alt");
    }
}
