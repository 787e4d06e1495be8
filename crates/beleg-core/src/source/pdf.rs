//! Embedded text of PDF files via lopdf and pdf-extract.

#[cfg(feature = "pdf")]
use tracing::debug;

use super::Result;
use crate::error::SourceError;

/// Extract the embedded text layer of a PDF.
///
/// Documents encrypted with an empty user password are decrypted first.
/// Scanned PDFs without a text layer yield an empty string.
#[cfg(feature = "pdf")]
pub fn extract_pdf_text(data: &[u8]) -> Result<String> {
    use lopdf::Document;

    let mut doc = Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;

    let decrypted;
    let bytes = if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(SourceError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| SourceError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
        decrypted = buffer;
        decrypted.as_slice()
    } else {
        data
    };

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(SourceError::NoPages);
    }

    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| SourceError::Pdf(e.to_string()))?;
    debug!("Extracted {} chars from {} PDF pages", text.len(), page_count);

    Ok(text)
}

/// PDF support was compiled out.
#[cfg(not(feature = "pdf"))]
pub fn extract_pdf_text(_data: &[u8]) -> Result<String> {
    Err(SourceError::PdfDisabled)
}
