//! End-to-end extraction through the public API.

use std::path::Path;
use std::str::FromStr;

use beleg_core::invoice::rules::normalize_to_string;
use beleg_core::source::DemoTextProducer;
use beleg_core::{
    capture_json_values, extract_fields, extract_from_llm_response, extract_from_ocr_text,
    extract_line_items, normalize, parse_amount, BelegConfig, ExtractionSource, InvoiceEngine,
    InvoiceExtractor, InvoiceFields, LineItem, TextProducer,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn vendor_template_fields() {
    let fields = extract_fields("SUMME 343,91\nDatum: 15.02.2023\nLieferant: Beispiel GmbH");

    assert_eq!(
        fields,
        InvoiceFields {
            date: Some("15.02.2023".to_string()),
            amount: Some("343,91".to_string()),
            supplier: Some("Beispiel GmbH".to_string()),
        }
    );
}

#[test]
fn no_matching_content_yields_one_zero_row() {
    let items = extract_line_items("no matching content");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity_value, Some(Decimal::ZERO));
    assert_eq!(items[0].unit_price_value, Some(Decimal::ZERO));
    assert_eq!(items[0].total_price_value, Some(Decimal::ZERO));
}

#[test]
fn normalizer_locale_equivalence_and_idempotence() {
    assert_eq!(normalize("1.234,56").unwrap(), dec("1234.56"));
    assert_eq!(normalize("1234.56").unwrap(), dec("1234.56"));
    assert_eq!(normalize("56,50").unwrap(), dec("56.50"));

    for raw in ["1.234,56", "343,91 €", "EUR 12.50", "1.234.567,89", "0,5", "7"] {
        let once = normalize(raw).unwrap();
        assert_eq!(normalize(&normalize_to_string(once)).unwrap(), once, "{}", raw);
    }

    assert!(normalize("k.A.").is_err());
    assert_eq!(parse_amount("—"), None);
}

#[test]
fn demo_invoice_through_ocr_entry_point() {
    let text = DemoTextProducer::new()
        .produce(Path::new("rechnung.pdf"))
        .unwrap();
    let invoice = extract_from_ocr_text(&text);

    assert_eq!(invoice.source, ExtractionSource::OcrHeuristic);
    assert_eq!(invoice.supplier.as_deref(), Some("Beispiel GmbH"));
    assert_eq!(invoice.date.as_deref(), Some("15.02.2023"));
    // The first amount-keyword line is the subtotal.
    assert_eq!(invoice.amount.as_deref(), Some("289.00"));
    assert_eq!(invoice.line_items.len(), 2);
    assert_eq!(invoice.line_items[0].description, "Premium Service");
    assert_eq!(invoice.line_items[1].total_price_value, Some(dec("90.00")));
    assert!(!invoice.needs_manual_review());
}

#[test]
fn demo_receipt_through_ocr_entry_point() {
    let text = DemoTextProducer::new()
        .produce(Path::new("beleg-07.pdf"))
        .unwrap();
    let invoice = extract_from_ocr_text(&text);

    assert_eq!(invoice.supplier.as_deref(), Some("Einzelhandel KG"));
    assert_eq!(invoice.date.as_deref(), Some("10.02.2023"));
    assert_eq!(invoice.amount.as_deref(), Some("74.74"));
    assert_eq!(invoice.amount_value, Some(dec("74.74")));
    assert_eq!(invoice.line_items, vec![LineItem::unassigned()]);
}

#[test]
fn strict_json_response() {
    let response = r#"{"lieferant":"Foo","datum":"01.02.2024","gesamtbetrag":"1.056,50","positionen":[{"beschreibung":"Teil","menge":"2","einzelpreis":"528,25","gesamtpreis":"1056,50"}]}"#;
    let invoice = extract_from_llm_response(response);

    assert_eq!(invoice.source, ExtractionSource::LlmJson);
    assert_eq!(invoice.amount.as_deref(), Some("1056.50 €"));
    assert_eq!(invoice.line_items.len(), 1);
    assert_eq!(invoice.line_items[0].unit_price_value, Some(dec("528.25")));
    assert!(!invoice.is_placeholder);
}

#[test]
fn safety_net_reads_invalid_json() {
    let text = r#"{ "lieferant": "Foo GmbH", "datum": "01.01.2024", "positionen": [ {"beschreibung": oops } "#;
    let draft = capture_json_values(text, "€");

    assert_eq!(draft.supplier.as_deref(), Some("Foo GmbH"));
    assert_eq!(draft.date.as_deref(), Some("01.01.2024"));
}

#[test]
fn invalid_json_never_yields_empty_result() {
    let response = "Ergebnis:\n```json\n{\"lieferant\": \"Foo GmbH\", \"datum\": \"01.01.2024\", \"gesamtbetrag\": \"99,00\",, \"positionen\": [{\"beschreibung\": \"Teil\"}\n```";
    let invoice = extract_from_llm_response(response);

    assert_eq!(invoice.source, ExtractionSource::LlmFallbackRegex);
    assert_eq!(invoice.supplier.as_deref(), Some("Foo GmbH"));
    assert_eq!(invoice.date.as_deref(), Some("01.01.2024"));
    assert_eq!(invoice.amount.as_deref(), Some("99.00 €"));
    assert!(!invoice.is_placeholder);
}

#[test]
fn prose_amount_matches_json_amount_format() {
    let prose = extract_from_llm_response("Lieferant: Foo GmbH\nSumme: 1.234,56 €\n");
    let json = extract_from_llm_response(
        r#"{"lieferant": "Foo GmbH", "datum": "01.01.2024", "gesamtbetrag": "1.234,56", "positionen": []}"#,
    );

    assert_eq!(prose.source, ExtractionSource::LlmFallbackRegex);
    assert_eq!(json.source, ExtractionSource::LlmJson);
    assert_eq!(prose.amount.as_deref(), Some("1234.56 €"));
    assert_eq!(prose.amount, json.amount);
    assert_eq!(prose.amount_value, Some(dec("1234.56")));
}

#[test]
fn refusal_becomes_placeholder() {
    let response = "Es tut mir leid, auf dem Bild ist keine Rechnung zu erkennen.";
    let invoice = extract_from_llm_response(response);

    assert!(invoice.is_placeholder);
    assert!(invoice.needs_manual_review());
    assert_eq!(invoice.full_text, response);
    assert_eq!(invoice.line_items, vec![LineItem::unassigned()]);
}

#[test]
fn engine_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"extraction": {"line_item_labels": ["Inspektion"], "generic_rows": false}}"#,
    )
    .unwrap();

    let config = BelegConfig::from_file(&path).unwrap();
    let engine = InvoiceEngine::new(&config.extraction).unwrap();
    let invoice = engine.extract_from_ocr_text("Autohaus Nord\nInspektion 1 189,00 189,00\nAutoreparatur 1 50,00 50,00");

    assert_eq!(invoice.line_items.len(), 1);
    assert_eq!(invoice.line_items[0].description, "Inspektion");
    assert_eq!(invoice.supplier.as_deref(), Some("Autohaus Nord"));
}
