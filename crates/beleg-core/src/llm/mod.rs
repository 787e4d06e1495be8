//! Parsing of vision-model responses.
//!
//! The model is asked for a JSON object (see [`prompt::EXTRACTION_PROMPT`]),
//! but answers arrive wrapped in prose, fenced, truncated or with
//! locale-formatted numbers. [`LlmResponseParser`] recovers what it can.

pub mod capture;
pub mod fallback;
pub mod parser;
pub mod payload;
pub mod prompt;
pub mod repair;

pub use capture::capture_json_values;
pub use parser::LlmResponseParser;
pub use payload::{LlmInvoicePayload, LlmPosition};
pub use prompt::{EXTRACTION_PROMPT, PROMPT_KEYS};
