//! Core library for German invoice and receipt extraction.
//!
//! This crate provides:
//! - Keyword-anchored header field extraction (date, total amount, supplier)
//! - Template and table based line item detection
//! - Locale-tolerant numeric normalization and line item reconciliation
//! - Parsing of vision-model responses, including malformed JSON
//! - Text producers for text files, PDFs, external commands and demo data

pub mod error;
pub mod invoice;
pub mod llm;
pub mod models;
pub mod source;

pub use error::{BelegError, NumericFormatError, Result, SourceError};
pub use invoice::rules::{normalize, parse_amount, InvoiceFields};
pub use invoice::{
    extract_fields, extract_from_llm_response, extract_from_ocr_text, extract_line_items,
    parse_llm_response, InvoiceEngine, InvoiceExtractor,
};
pub use llm::{capture_json_values, LlmResponseParser, EXTRACTION_PROMPT};
pub use models::config::{BelegConfig, ExtractionConfig, ProducerConfig, ProducerKind};
pub use models::invoice::{ExtractedInvoice, ExtractionSource, LineItem};
pub use source::{create_producer, TextProducer};
