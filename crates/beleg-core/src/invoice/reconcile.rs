//! Fills missing line item prices from the fields that are present.

use rust_decimal::Decimal;
use tracing::trace;

use super::rules::amounts::normalize_to_string;
use crate::models::invoice::LineItem;

/// Reconcile every item, preserving order. The input is left untouched.
pub fn reconcile(items: &[LineItem]) -> Vec<LineItem> {
    items.iter().map(reconcile_item).collect()
}

/// Derive at most one missing price of a single item.
///
/// The unit price is derived from the total first; the total is derived from
/// the unit price only when that is not possible. A missing quantity counts as
/// 1 and is never computed from the price ratio. Raw text is only written for
/// fields that had none.
pub fn reconcile_item(item: &LineItem) -> LineItem {
    let mut out = item.clone();

    let quantity = match item.quantity_value {
        Some(quantity) => quantity,
        None => {
            out.quantity_value = Some(Decimal::ONE);
            if out.quantity_raw.trim().is_empty() {
                out.quantity_raw = "1".to_string();
            }
            Decimal::ONE
        }
    };

    let unit = item.unit_price_value.filter(|v| !v.is_zero());
    let total = item.total_price_value.filter(|v| !v.is_zero());

    match (unit, total) {
        (None, Some(total)) if quantity > Decimal::ZERO && total > Decimal::ZERO => {
            if let Some(derived) = total.checked_div(quantity) {
                trace!("Derived unit price {} for {:?}", derived, item.description);
                out.unit_price_value = Some(derived);
                fill_raw(&mut out.unit_price_raw, derived);
            }
        }
        (Some(unit), None) if unit > Decimal::ZERO => {
            if let Some(derived) = unit.checked_mul(quantity) {
                trace!("Derived total price {} for {:?}", derived, item.description);
                out.total_price_value = Some(derived);
                fill_raw(&mut out.total_price_raw, derived);
            }
        }
        _ => {}
    }

    out
}

fn fill_raw(raw: &mut String, value: Decimal) {
    if raw.trim().is_empty() {
        *raw = normalize_to_string(value.round_dp(2));
    }
}
