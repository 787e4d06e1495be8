//! Extracted invoice data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::invoice::reconcile::reconcile;
use crate::invoice::rules::amounts::{normalize, parse_amount};
use crate::invoice::rules::dates::parse_invoice_date;

/// Description used for the synthetic row emitted when no line items were found.
pub const UNASSIGNED_DESCRIPTION: &str = "Nicht zugeordnete Position";

/// Where the values of an [`ExtractedInvoice`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// Keyword heuristics over OCR text.
    OcrHeuristic,
    /// Strictly parsed JSON from an LLM response.
    LlmJson,
    /// Regex capture over an LLM response that yielded no usable JSON.
    LlmFallbackRegex,
}

impl ExtractionSource {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionSource::OcrHeuristic => "ocr_heuristic",
            ExtractionSource::LlmJson => "llm_json",
            ExtractionSource::LlmFallbackRegex => "llm_fallback_regex",
        }
    }
}

/// The engine's output for one extraction attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    /// Source text, preserved verbatim.
    pub full_text: String,

    /// Issue date in the textual form it was found.
    pub date: Option<String>,

    /// Total amount as text.
    pub amount: Option<String>,

    /// `amount` run through the numeric normalizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_value: Option<Decimal>,

    /// Supplier name.
    pub supplier: Option<String>,

    /// Invoice number (only LLM responses carry one).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Full transcription returned by the LLM alongside the structured fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    /// Line items, in document order.
    pub line_items: Vec<LineItem>,

    /// Provenance of the values.
    pub source: ExtractionSource,

    /// True when nothing at all could be extracted.
    pub is_placeholder: bool,

    /// Notes about fallbacks taken during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractedInvoice {
    /// Whether a human should enter the data by hand instead of persisting it.
    pub fn needs_manual_review(&self) -> bool {
        self.is_placeholder
            || (self.date.is_none() && self.amount.is_none() && self.supplier.is_none())
    }

    /// Calendar date of `date`, if it is in a recognized format.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_invoice_date)
    }

    /// Line items other than the synthetic unassigned row.
    pub fn real_line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| !item.is_unassigned())
    }
}

/// A single invoice row.
///
/// The `*_raw` fields keep the text that was read; the `*_value` fields hold
/// the normalized numbers, or `None` where the text was not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    pub quantity_raw: String,
    pub quantity_value: Option<Decimal>,

    pub unit_price_raw: String,
    pub unit_price_value: Option<Decimal>,

    pub total_price_raw: String,
    pub total_price_value: Option<Decimal>,
}

impl LineItem {
    /// Build a row from raw strings, normalizing each numeric field.
    pub fn from_raw(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        total_price: impl Into<String>,
    ) -> Self {
        let quantity_raw = quantity.into();
        let unit_price_raw = unit_price.into();
        let total_price_raw = total_price.into();

        Self {
            description: description.into().trim().to_string(),
            quantity_value: parse_amount(&quantity_raw),
            unit_price_value: parse_amount(&unit_price_raw),
            total_price_value: parse_amount(&total_price_raw),
            quantity_raw,
            unit_price_raw,
            total_price_raw,
        }
    }

    /// The synthetic row used when a document yields no rows at all.
    pub fn unassigned() -> Self {
        Self {
            description: UNASSIGNED_DESCRIPTION.to_string(),
            quantity_raw: "0".to_string(),
            quantity_value: Some(Decimal::ZERO),
            unit_price_raw: "0".to_string(),
            unit_price_value: Some(Decimal::ZERO),
            total_price_raw: "0".to_string(),
            total_price_value: Some(Decimal::ZERO),
        }
    }

    /// Check whether this is the synthetic unassigned row.
    pub fn is_unassigned(&self) -> bool {
        let zero = Some(Decimal::ZERO);
        self.description == UNASSIGNED_DESCRIPTION
            && self.quantity_value == zero
            && self.unit_price_value == zero
            && self.total_price_value == zero
    }
}

/// Mutable accumulator the extractors fill before an [`ExtractedInvoice`] is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub supplier: Option<String>,
    pub invoice_number: Option<String>,
    pub transcript: Option<String>,
    pub line_items: Vec<LineItem>,
    pub warnings: Vec<String>,
}

impl InvoiceDraft {
    /// True when any header field or a real line item is present.
    pub fn has_signal(&self) -> bool {
        has_text(&self.date)
            || has_text(&self.amount)
            || has_text(&self.supplier)
            || self.line_items.iter().any(|item| !item.is_unassigned())
    }

    /// Reconcile line items and freeze the draft.
    pub fn finish(self, full_text: &str, source: ExtractionSource) -> ExtractedInvoice {
        let is_placeholder = !self.has_signal();
        let amount = non_empty(self.amount);
        let amount_value = amount.as_deref().and_then(|a| normalize(a).ok());

        trace!(
            "Finishing draft from {} with {} line items",
            source.label(),
            self.line_items.len()
        );

        ExtractedInvoice {
            full_text: full_text.to_string(),
            date: non_empty(self.date),
            amount,
            amount_value,
            supplier: non_empty(self.supplier),
            invoice_number: non_empty(self.invoice_number),
            transcript: non_empty(self.transcript),
            line_items: reconcile(&self.line_items),
            source,
            is_placeholder,
            warnings: self.warnings,
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
