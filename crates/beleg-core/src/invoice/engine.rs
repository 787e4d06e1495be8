//! Extraction engine combining header rules, row templates and LLM parsing.

use std::time::Instant;

use lazy_static::lazy_static;
use tracing::info;

use super::rules::{normalize_to_string, parse_amount, HeaderFieldExtractor, InvoiceFields, LineItemMatcher};
use super::InvoiceExtractor;
use crate::error::Result;
use crate::llm::LlmResponseParser;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{ExtractedInvoice, ExtractionSource, InvoiceDraft, LineItem};

lazy_static! {
    static ref DEFAULT_ENGINE: InvoiceEngine =
        InvoiceEngine::new(&ExtractionConfig::default()).expect("built-in extraction config is valid");
}

/// Engine built from the keyword sets and templates in [`ExtractionConfig`].
///
/// Immutable after construction and safe to share between threads.
#[derive(Debug, Clone)]
pub struct InvoiceEngine {
    fields: HeaderFieldExtractor,
    line_items: LineItemMatcher,
    llm: LlmResponseParser,
}

impl InvoiceEngine {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let line_items = LineItemMatcher::new(config)?;

        Ok(Self {
            fields: HeaderFieldExtractor::new(config)?,
            llm: LlmResponseParser::new(config, line_items.clone()),
            line_items,
        })
    }

    /// Date, amount and supplier from plain text.
    pub fn extract_fields(&self, text: &str) -> InvoiceFields {
        self.fields.extract_fields(text)
    }

    /// Line items from plain text; never empty.
    pub fn extract_line_items(&self, text: &str) -> Vec<LineItem> {
        self.line_items.extract_line_items(text)
    }

    /// Tiered parse of an LLM response.
    pub fn parse_llm_response(&self, response: &str) -> ExtractedInvoice {
        self.llm.parse(response)
    }
}

impl InvoiceExtractor for InvoiceEngine {
    fn extract_from_ocr_text(&self, raw_text: &str) -> ExtractedInvoice {
        let start = Instant::now();
        let fields = self.extract_fields(raw_text);
        let line_items = self.extract_line_items(raw_text);

        let mut warnings = Vec::new();
        if fields.date.is_none() {
            warnings.push("Could not extract invoice date".to_string());
        }
        if fields.amount.is_none() {
            warnings.push("Could not extract total amount".to_string());
        }
        if fields.supplier.is_none() {
            warnings.push("Could not extract supplier".to_string());
        }

        let amount = fields
            .amount
            .map(|raw| parse_amount(&raw).map(normalize_to_string).unwrap_or(raw));

        let draft = InvoiceDraft {
            date: fields.date,
            amount,
            supplier: fields.supplier,
            line_items,
            warnings,
            ..Default::default()
        };
        let invoice = draft.finish(raw_text, ExtractionSource::OcrHeuristic);

        info!(
            "Extracted invoice from text in {:?} ({} line items, {} warnings)",
            start.elapsed(),
            invoice.line_items.len(),
            invoice.warnings.len()
        );

        invoice
    }

    fn extract_from_llm_response(&self, response: &str) -> ExtractedInvoice {
        self.parse_llm_response(response)
    }
}

/// Engine using the built-in keyword sets and templates.
pub fn default_engine() -> &'static InvoiceEngine {
    &DEFAULT_ENGINE
}

/// [`InvoiceEngine::extract_fields`] on the default engine.
pub fn extract_fields(text: &str) -> InvoiceFields {
    DEFAULT_ENGINE.extract_fields(text)
}

/// [`InvoiceEngine::extract_line_items`] on the default engine.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    DEFAULT_ENGINE.extract_line_items(text)
}

/// [`InvoiceEngine::parse_llm_response`] on the default engine.
pub fn parse_llm_response(response: &str) -> ExtractedInvoice {
    DEFAULT_ENGINE.parse_llm_response(response)
}

/// OCR-text entry point on the default engine.
pub fn extract_from_ocr_text(raw_text: &str) -> ExtractedInvoice {
    DEFAULT_ENGINE.extract_from_ocr_text(raw_text)
}

/// LLM-response entry point on the default engine.
pub fn extract_from_llm_response(response: &str) -> ExtractedInvoice {
    DEFAULT_ENGINE.extract_from_llm_response(response)
}
