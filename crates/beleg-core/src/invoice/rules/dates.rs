//! Date extraction for German invoices.

use chrono::NaiveDate;

use super::patterns::DATE_DMY;
use super::FieldExtractor;

/// Formats accepted when a textual date is turned into a calendar date.
///
/// Two-digit years come first: `%Y` also accepts `24` as the year 24.
const CALENDAR_FORMATS: &[&str] = &["%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Date field extractor for `DD.MM.YYYY` and `DD.MM.YY`.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE_DMY.find(text).map(|m| m.as_str().to_string())
    }
}

/// Parse a textual invoice date into a calendar date.
///
/// The engine keeps dates as text; this is for consumers that need the day.
pub fn parse_invoice_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    CALENDAR_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
