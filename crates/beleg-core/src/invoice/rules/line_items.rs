//! Line item detection from plain invoice text.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::amounts::{extract_sum_anchor, parse_amount};
use super::patterns::{GENERIC_ROW, NUMBER_TOKEN};
use crate::error::{BelegError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::LineItem;

/// Largest gap between `quantity × unit` and the printed total for a generic row.
const GENERIC_ROW_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A vendor row template: a label followed by quantity, unit price and total.
#[derive(Debug, Clone)]
struct RowTemplate {
    label: String,
    pattern: Regex,
}

impl RowTemplate {
    fn new(label: &str) -> Result<Self> {
        let token = format!(r"({})\s*€?", NUMBER_TOKEN);
        let pattern = Regex::new(&format!(
            r"(?i)\b({label})\s+{token}\s+{token}\s+{token}\s*$",
            label = regex::escape(label.trim()),
            token = token,
        ))
        .map_err(|e| BelegError::Config(format!("line item label {:?}: {}", label, e)))?;

        Ok(Self {
            label: label.trim().to_string(),
            pattern,
        })
    }

    fn parse(&self, line: &str) -> Option<LineItem> {
        let caps = self.pattern.captures(line)?;
        debug!("Row matched template {}", self.label);
        Some(LineItem::from_raw(&caps[1], &caps[2], &caps[3], &caps[4]))
    }
}

/// Conservative, template-driven row matcher.
///
/// Each line matches at most one template, tried in configuration order. The
/// generic table heuristic runs last and only accepts rows whose arithmetic
/// checks out.
#[derive(Debug, Clone)]
pub struct LineItemMatcher {
    templates: Vec<RowTemplate>,
    generic_rows: bool,
}

impl LineItemMatcher {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let templates = config
            .line_item_labels
            .iter()
            .filter(|label| !label.trim().is_empty())
            .map(|label| RowTemplate::new(label))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            templates,
            generic_rows: config.generic_rows,
        })
    }

    /// Extract line items. Never empty: without matches a single unassigned row is returned.
    pub fn extract_line_items(&self, text: &str) -> Vec<LineItem> {
        let mut items: Vec<LineItem> = text.lines().filter_map(|line| self.parse_line(line)).collect();

        if let Some(sum) = extract_sum_anchor(text) {
            let item_total: Decimal = items.iter().filter_map(|i| i.total_price_value).sum();
            debug!(
                "SUMME anchor {} against {} from {} line items",
                sum,
                item_total,
                items.len()
            );
        }

        if items.is_empty() {
            debug!("No line items matched, using unassigned row");
            items.push(LineItem::unassigned());
        }

        items
    }

    fn parse_line(&self, line: &str) -> Option<LineItem> {
        self.templates
            .iter()
            .find_map(|template| template.parse(line))
            .or_else(|| self.generic_rows.then(|| parse_generic_row(line)).flatten())
    }
}

fn parse_generic_row(line: &str) -> Option<LineItem> {
    let caps = GENERIC_ROW.captures(line)?;

    let quantity = parse_amount(&caps[2])?;
    let unit_price = parse_amount(&caps[3])?;
    let total_price = parse_amount(&caps[4])?;

    let expected = quantity.checked_mul(unit_price)?;
    if quantity.is_zero() || (expected - total_price).abs() > GENERIC_ROW_TOLERANCE {
        return None;
    }

    Some(LineItem::from_raw(caps[1].trim(), &caps[2], &caps[3], &caps[4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn matcher() -> LineItemMatcher {
        LineItemMatcher::new(&ExtractionConfig::default()).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_vendor_templates() {
        let text = "Werkstatt Süd\nAutoreparatur 1 250,00 250,00\nErsatzteile 4 12,50 50,00\nSUMME 300,00";
        let items = matcher().extract_line_items(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Autoreparatur");
        assert_eq!(items[0].quantity_value, Some(dec("1")));
        assert_eq!(items[0].unit_price_raw, "250,00");
        assert_eq!(items[1].description, "Ersatzteile");
        assert_eq!(items[1].unit_price_value, Some(dec("12.50")));
        assert_eq!(items[1].total_price_value, Some(dec("50.00")));
    }

    #[test]
    fn test_template_requires_exactly_three_tokens() {
        let items = matcher().extract_line_items("Autoreparatur 250,00 250,00");
        assert_eq!(items, vec![LineItem::unassigned()]);

        let items = matcher().extract_line_items("Ersatzteile 1 2 3 4");
        assert_eq!(items, vec![LineItem::unassigned()]);
    }

    #[test]
    fn test_template_keeps_raw_text() {
        let items = matcher().extract_line_items("ersatzteile 2 1.250,00 € 2.500,00 €");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "ersatzteile");
        assert_eq!(items[0].unit_price_raw, "1.250,00");
        assert_eq!(items[0].total_price_value, Some(dec("2500.00")));
    }

    #[test]
    fn test_generic_rows() {
        let text = "\
Pos.  Bezeichnung                  Anzahl     Einzelpreis     Gesamtpreis
1     Produkt A                      2         59,99 €         119,98 €
2     Dienstleistung B               3         45,00 €         135,00 €
                                                Gesamtbetrag:   254,98 €";
        let items = matcher().extract_line_items(text);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Produkt A");
        assert_eq!(items[1].description, "Dienstleistung B");
        assert_eq!(items[1].quantity_value, Some(dec("3")));
        assert_eq!(items[1].total_price_value, Some(dec("135.00")));
    }

    #[test]
    fn test_generic_row_rejects_inconsistent_arithmetic() {
        let items = matcher().extract_line_items("Produkt A 2 59,99 € 100,00 €");
        assert_eq!(items, vec![LineItem::unassigned()]);
    }

    #[test]
    fn test_generic_rows_can_be_disabled() {
        let config = ExtractionConfig {
            generic_rows: false,
            ..Default::default()
        };
        let matcher = LineItemMatcher::new(&config).unwrap();

        let items = matcher.extract_line_items("Produkt A 2 59,99 € 119,98 €");
        assert_eq!(items, vec![LineItem::unassigned()]);
    }

    #[test]
    fn test_no_items_yields_single_unassigned_row() {
        let items = matcher().extract_line_items("no matching content");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_unassigned());
        assert_eq!(items[0].total_price_value, Some(Decimal::ZERO));
    }

    #[test]
    fn test_custom_labels() {
        let config = ExtractionConfig {
            line_item_labels: vec!["Reifenwechsel".to_string()],
            generic_rows: false,
            ..Default::default()
        };
        let matcher = LineItemMatcher::new(&config).unwrap();

        let items = matcher.extract_line_items("Reifenwechsel 4 15,00 60,00");
        assert_eq!(items[0].description, "Reifenwechsel");
    }
}
