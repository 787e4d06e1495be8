//! Invoice field extraction module.

mod engine;
pub mod reconcile;
pub mod rules;

pub use engine::{
    default_engine, extract_fields, extract_from_llm_response, extract_from_ocr_text,
    extract_line_items, parse_llm_response, InvoiceEngine,
};

use crate::models::invoice::ExtractedInvoice;

/// Trait for invoice extractors.
pub trait InvoiceExtractor {
    /// Extract invoice data from OCR or plain document text.
    fn extract_from_ocr_text(&self, raw_text: &str) -> ExtractedInvoice;

    /// Extract invoice data from a vision-model response.
    fn extract_from_llm_response(&self, response: &str) -> ExtractedInvoice;
}
