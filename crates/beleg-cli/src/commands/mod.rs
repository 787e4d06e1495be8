//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use beleg_core::{BelegConfig, ExtractedInvoice, InvoiceEngine, InvoiceExtractor, TextProducer};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("beleg")
        .join("config.json")
}

/// Config file named on the command line, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<BelegConfig> {
    let path = config_path(explicit);

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(BelegConfig::from_file(&path)?)
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    } else {
        Ok(BelegConfig::default())
    }
}

/// Run one file through the producer and the engine.
///
/// With `llm` set the file holds a saved vision-model response and is parsed
/// as such; otherwise the producer supplies the document text.
pub fn extract_file(
    path: &Path,
    llm: bool,
    engine: &InvoiceEngine,
    producer: &dyn TextProducer,
) -> anyhow::Result<ExtractedInvoice> {
    if llm {
        let response = fs::read_to_string(path)?;
        return Ok(engine.extract_from_llm_response(&response));
    }

    let text = producer.produce(path)?;
    debug!("{} producer returned {} chars", producer.name(), text.len());
    Ok(engine.extract_from_ocr_text(&text))
}
