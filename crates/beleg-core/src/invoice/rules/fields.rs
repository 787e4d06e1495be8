//! Keyword-anchored extraction of date, amount and supplier.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::amounts::{extract_sum_anchor, parse_amount, AmountExtractor};
use super::dates::DateExtractor;
use super::FieldExtractor;
use crate::error::{BelegError, Result};
use crate::models::config::ExtractionConfig;

/// Header fields found in plain invoice text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub supplier: Option<String>,
}

/// Case-insensitive keyword set matched against single lines.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    patterns: Vec<Regex>,
}

impl KeywordSet {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let patterns = keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| {
                Regex::new(&format!("(?i){}", regex::escape(k)))
                    .map_err(|e| BelegError::Config(format!("keyword {:?}: {}", k, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Check whether the line contains any keyword.
    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    /// Lines of `text` that contain a keyword, in document order.
    pub fn lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.lines().filter(move |line| self.matches(line))
    }

    /// Text after the first keyword (in keyword order) found in the line.
    pub fn strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find_map(|p| p.find(line))
            .map(|m| &line[m.end()..])
    }
}

/// Extracts header fields by keyword proximity.
///
/// Lines containing a field's keywords are searched before the whole text,
/// so a labeled value wins even when an unlabeled one appears earlier.
#[derive(Debug, Clone)]
pub struct HeaderFieldExtractor {
    date_keywords: KeywordSet,
    amount_keywords: KeywordSet,
    supplier_keywords: KeywordSet,
    supplier_header_lines: usize,
}

impl HeaderFieldExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            date_keywords: KeywordSet::new(&config.date_keywords)?,
            amount_keywords: KeywordSet::new(&config.amount_keywords)?,
            supplier_keywords: KeywordSet::new(&config.supplier_keywords)?,
            supplier_header_lines: config.supplier_header_lines,
        })
    }

    /// Extract date, amount and supplier. Fields that are not found are `None`.
    pub fn extract_fields(&self, text: &str) -> InvoiceFields {
        InvoiceFields {
            date: self.extract_date(text),
            amount: self.extract_amount(text),
            supplier: self.extract_supplier(text),
        }
    }

    fn extract_date(&self, text: &str) -> Option<String> {
        let dates = DateExtractor::new();

        self.date_keywords
            .lines(text)
            .find_map(|line| dates.extract(line))
            .or_else(|| dates.extract(text))
    }

    fn extract_amount(&self, text: &str) -> Option<String> {
        if let Some(sum) = extract_sum_anchor(text) {
            debug!("Amount taken from SUMME anchor: {}", sum);
            return Some(sum);
        }

        let amounts = AmountExtractor::new();

        self.amount_keywords
            .lines(text)
            .find_map(|line| amounts.extract(line))
            .or_else(|| amounts.extract(text))
            .filter(|amount| parse_amount(amount).is_some())
    }

    fn extract_supplier(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();

        if let Some(idx) = lines.iter().position(|l| self.supplier_keywords.matches(l)) {
            let name = self
                .supplier_keywords
                .strip(lines[idx])
                .unwrap_or_default()
                .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
                .trim();

            if !name.is_empty() {
                return Some(name.to_string());
            }

            // Label on its own line, name below it
            return lines[idx + 1..]
                .iter()
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .map(String::from);
        }

        lines
            .iter()
            .take(self.supplier_header_lines)
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(String::from)
    }
}
