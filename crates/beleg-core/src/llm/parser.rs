//! Tiered parsing of LLM responses into invoices.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::capture::capture_json_values;
use super::fallback::extract_from_prose;
use super::payload::LlmInvoicePayload;
use super::repair::{locate_candidate, repair_candidate, strip_code_fences};
use crate::invoice::rules::LineItemMatcher;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{ExtractedInvoice, ExtractionSource, InvoiceDraft};

/// Turns a free-form LLM answer into an [`ExtractedInvoice`].
///
/// The answer is searched for the requested JSON object, which is repaired
/// and captured field by field before a strict parse is attempted. The
/// captured fields are the baseline; strictly parsed values overlay them.
/// Without usable JSON the answer is read as prose.
#[derive(Debug, Clone)]
pub struct LlmResponseParser {
    matcher: LineItemMatcher,
    currency_suffix: String,
}

impl LlmResponseParser {
    pub fn new(config: &ExtractionConfig, matcher: LineItemMatcher) -> Self {
        Self {
            matcher,
            currency_suffix: config.currency_suffix.trim().to_string(),
        }
    }

    /// Parse a response. Never fails; a response without any invoice data
    /// yields a placeholder.
    pub fn parse(&self, response: &str) -> ExtractedInvoice {
        let start = Instant::now();
        let (draft, source) = self.parse_draft(response);
        let invoice = draft.finish(response, source);

        info!(
            "Parsed LLM response via {} in {:?} ({} line items{})",
            source.label(),
            start.elapsed(),
            invoice.line_items.len(),
            if invoice.is_placeholder { ", placeholder" } else { "" }
        );

        invoice
    }

    fn parse_draft(&self, response: &str) -> (InvoiceDraft, ExtractionSource) {
        let cleaned = strip_code_fences(response);

        match locate_candidate(&cleaned) {
            Some(candidate) => {
                let repaired = repair_candidate(candidate);
                let baseline = capture_json_values(&repaired, &self.currency_suffix);

                match serde_json::from_str::<LlmInvoicePayload>(&repaired) {
                    Ok(payload) => {
                        let mut draft = baseline;
                        payload.apply_to(&mut draft, &self.currency_suffix);
                        fill_supplier_from_invoice_number(&mut draft);

                        if draft.has_signal() {
                            return (draft, ExtractionSource::LlmJson);
                        }
                        warn!("LLM JSON parsed but carried no invoice data");
                    }
                    Err(e) => {
                        warn!("Strict JSON parse failed: {}", e);

                        let mut draft = baseline;
                        fill_supplier_from_invoice_number(&mut draft);
                        if draft.has_signal() {
                            draft
                                .warnings
                                .push(format!("LLM JSON was invalid ({}); fields captured individually", e));
                            return (draft, ExtractionSource::LlmFallbackRegex);
                        }
                    }
                }
            }
            None => debug!("No JSON object found in LLM response"),
        }

        let mut draft = extract_from_prose(response, &self.matcher, &self.currency_suffix);
        draft
            .warnings
            .push("No usable JSON in LLM response; fields read from text".to_string());
        (draft, ExtractionSource::LlmFallbackRegex)
    }
}

/// An invoice number is the supplier reference of last resort.
fn fill_supplier_from_invoice_number(draft: &mut InvoiceDraft) {
    let has_supplier = draft
        .supplier
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    if has_supplier {
        return;
    }
    if let Some(number) = &draft.invoice_number {
        draft.supplier = Some(format!("Rechnungsnummer: {}", number));
    }
}
