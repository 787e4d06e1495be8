//! Amount extraction and locale-independent number normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_PATTERN, SUM_ANCHOR};
use super::FieldExtractor;
use crate::error::NumericFormatError;

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        AMOUNT_PATTERN
            .find(text)
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Number following the `SUMME` anchor of the known vendor template.
pub fn extract_sum_anchor(text: &str) -> Option<String> {
    SUM_ANCHOR.captures(text).map(|caps| caps[1].to_string())
}

/// Normalize a locale-ambiguous numeric string into a decimal.
///
/// Everything except digits, `.` and `,` is dropped and commas become dots.
/// When several dots remain only the last one separates the fraction, so
/// `1.234,56`, `1,234.56` and `1234.56` all read as 1234.56.
///
/// A single separator is always a decimal point: `1.234` is 1.234, never 1234.
pub fn normalize(raw: &str) -> Result<Decimal, NumericFormatError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(NumericFormatError::NoDigits {
            input: raw.to_string(),
        });
    }

    let canonical = match cleaned.rfind('.') {
        Some(last_dot) => {
            let integer: String = cleaned[..last_dot].chars().filter(|c| *c != '.').collect();
            let fraction = &cleaned[last_dot + 1..];
            match (integer.is_empty(), fraction.is_empty()) {
                (_, true) => integer,
                (true, false) => format!("0.{}", fraction),
                (false, false) => format!("{}.{}", integer, fraction),
            }
        }
        None => cleaned,
    };

    Decimal::from_str(&canonical).map_err(|_| NumericFormatError::OutOfRange {
        input: raw.to_string(),
    })
}

/// Normalize, mapping failures to `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    normalize(raw).ok()
}

/// Canonical text form of a normalized value, with at least two decimals.
pub fn normalize_to_string(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() <= 2 {
        format!("{:.2}", value)
    } else {
        value.to_string()
    }
}
