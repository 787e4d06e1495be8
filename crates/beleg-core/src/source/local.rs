//! Producer reading text and PDF files from disk.

use std::path::Path;

use tracing::debug;

use super::pdf::extract_pdf_text;
use super::{read_bytes, Result, TextProducer};
use crate::error::SourceError;

/// Reads `.txt` files as UTF-8 and `.pdf` files through their text layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTextProducer;

impl LocalTextProducer {
    pub fn new() -> Self {
        Self
    }
}

impl TextProducer for LocalTextProducer {
    fn name(&self) -> &'static str {
        "local"
    }

    fn produce(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let text = match extension.as_str() {
            "txt" => {
                let bytes = read_bytes(path)?;
                String::from_utf8(bytes).map_err(|_| SourceError::Encoding(path.display().to_string()))?
            }
            "pdf" => extract_pdf_text(&read_bytes(path)?)?,
            other => return Err(SourceError::UnsupportedFormat(other.to_string())),
        };

        debug!("Read {} chars from {}", text.len(), path.display());
        Ok(text)
    }
}
