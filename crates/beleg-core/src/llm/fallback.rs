//! Recovery from LLM responses that carry no usable JSON at all.

use tracing::debug;

use super::capture::with_currency;
use crate::invoice::rules::patterns::{
    POSITIONS_BLOCK, POSITION_ROW, PROSE_AMOUNT, PROSE_DATE, PROSE_SUPPLIER,
};
use crate::invoice::rules::{normalize_to_string, parse_amount, LineItemMatcher};
use crate::models::invoice::{InvoiceDraft, LineItem};

/// Read labeled header fields and rows from a free-text answer.
///
/// Rows come from a `POSITIONEN:` block when there is one, otherwise from
/// the plain-text line item matcher.
pub fn extract_from_prose(
    text: &str,
    matcher: &LineItemMatcher,
    currency_suffix: &str,
) -> InvoiceDraft {
    let first = |pattern: &regex::Regex| {
        pattern
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let mut line_items = position_rows(text, currency_suffix);
    if line_items.is_empty() {
        line_items = matcher.extract_line_items(text);
    } else {
        debug!("Read {} rows from POSITIONEN block", line_items.len());
    }

    let amount = first(&PROSE_AMOUNT)
        .and_then(|raw| parse_amount(&raw))
        .map(|value| with_currency(&normalize_to_string(value), currency_suffix));

    InvoiceDraft {
        date: first(&PROSE_DATE),
        amount,
        supplier: first(&PROSE_SUPPLIER),
        line_items,
        ..Default::default()
    }
}

fn position_rows(text: &str, currency_suffix: &str) -> Vec<LineItem> {
    let Some(block) = POSITIONS_BLOCK.captures(text) else {
        return Vec::new();
    };

    POSITION_ROW
        .captures_iter(&block[1])
        .map(|caps| {
            LineItem::from_raw(
                &caps[1],
                &caps[2],
                with_currency(&caps[3], currency_suffix),
                with_currency(&caps[4], currency_suffix),
            )
        })
        .collect()
}
