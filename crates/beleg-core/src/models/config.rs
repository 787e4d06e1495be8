//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BelegError, Result};

/// Main configuration for beleg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BelegConfig {
    /// Field and line-item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text producer selection.
    pub producer: ProducerConfig,
}

/// Keyword sets and templates used by the extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines containing any of these are searched for the date first.
    pub date_keywords: Vec<String>,

    /// Lines containing any of these are searched for the amount first.
    pub amount_keywords: Vec<String>,

    /// Lines containing any of these carry the supplier name.
    pub supplier_keywords: Vec<String>,

    /// Number of top lines scanned when no supplier keyword is present.
    pub supplier_header_lines: usize,

    /// Labels of vendor-specific line item rows.
    pub line_item_labels: Vec<String>,

    /// Enable the generic tabular row heuristic after the vendor templates.
    pub generic_rows: bool,

    /// Currency marker appended to LLM price fields that lack one.
    pub currency_suffix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_keywords: strings(&["datum", "date", "vom", "ausstellungsdatum", "rechnungsdatum"]),
            amount_keywords: strings(&[
                "summe",
                "betrag",
                "total",
                "gesamtbetrag",
                "rechnungsbetrag",
                "zu zahlen",
            ]),
            supplier_keywords: strings(&[
                "absender",
                "lieferant",
                "von",
                "firma",
                "rechnungssteller",
                "verkäufer",
            ]),
            supplier_header_lines: 5,
            line_item_labels: strings(&["Autoreparatur", "Ersatzteile"]),
            generic_rows: true,
            currency_suffix: "€".to_string(),
        }
    }
}

/// Which text producer turns an input file into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerKind {
    /// Read text files and embedded PDF text directly.
    #[default]
    Local,
    /// Run an external command and use its stdout.
    Shell,
    /// Return canned demo invoices.
    Demo,
}

/// Text producer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Producer variant.
    pub kind: ProducerKind,

    /// Program run by the shell producer.
    pub command: String,

    /// Arguments placed before the input path.
    pub args: Vec<String>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            kind: ProducerKind::Local,
            command: "pdftotext".to_string(),
            args: strings(&["-layout"]),
        }
    }
}

impl BelegConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractors cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.producer.kind == ProducerKind::Shell && self.producer.command.trim().is_empty() {
            return Err(BelegError::Config(
                "producer.command must be set for the shell producer".to_string(),
            ));
        }
        if self.extraction.line_item_labels.iter().any(|l| l.trim().is_empty()) {
            return Err(BelegError::Config(
                "extraction.line_item_labels must not contain empty labels".to_string(),
            ));
        }
        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
