//! Error types for the beleg-core library.

use thiserror::Error;

/// Main error type for the beleg library.
#[derive(Error, Debug)]
pub enum BelegError {
    /// Numeric normalization error.
    #[error("numeric error: {0}")]
    Numeric(#[from] NumericFormatError),

    /// Text producer error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Raised by the numeric normalizer when a string cannot be read as a number.
///
/// Higher layers never propagate this; they record the field as absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericFormatError {
    /// Nothing numeric remained after stripping.
    #[error("no digits in {input:?}")]
    NoDigits { input: String },

    /// Digits were present but the value does not fit a decimal.
    #[error("value out of range: {input:?}")]
    OutOfRange { input: String },
}

/// Errors raised by text producers before any text reaches the engine.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file extension is not handled by the producer.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 text.
    #[error("{0} is not valid UTF-8")]
    Encoding(String),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// PDF support was not compiled in.
    #[error("PDF support is disabled in this build")]
    PdfDisabled,

    /// External command could not be started or exited unsuccessfully.
    #[error("command {program} failed: {reason}")]
    Command { program: String, reason: String },
}

/// Result type for the beleg library.
pub type Result<T> = std::result::Result<T, BelegError>;
