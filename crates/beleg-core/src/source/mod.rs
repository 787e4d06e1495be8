//! Text producers: collaborators that turn an input file into text.
//!
//! The engine itself never touches files; a producer hands it a string.

mod demo;
mod local;
mod pdf;
mod shell;

pub use demo::DemoTextProducer;
pub use local::LocalTextProducer;
pub use pdf::extract_pdf_text;
pub use shell::ShellScriptProducer;

use std::path::Path;

use crate::error::SourceError;
use crate::models::config::{ProducerConfig, ProducerKind};

/// Result type for producer operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Trait for text producers.
pub trait TextProducer: Send + Sync {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Produce the text of the document at `path`.
    fn produce(&self, path: &Path) -> Result<String>;
}

/// Build the producer selected by the configuration.
pub fn create_producer(config: &ProducerConfig) -> Box<dyn TextProducer> {
    match config.kind {
        ProducerKind::Local => Box::new(LocalTextProducer::new()),
        ProducerKind::Shell => Box::new(ShellScriptProducer::new(
            config.command.clone(),
            config.args.clone(),
        )),
        ProducerKind::Demo => Box::new(DemoTextProducer::new()),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| SourceError::Read {
        path: path.display().to_string(),
        source,
    })
}
