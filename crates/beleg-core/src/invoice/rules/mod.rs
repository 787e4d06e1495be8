//! Rule-based field extractors for German invoices.

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod line_items;
pub mod patterns;

pub use amounts::{extract_sum_anchor, normalize, normalize_to_string, parse_amount, AmountExtractor};
pub use dates::{parse_invoice_date, DateExtractor};
pub use fields::{HeaderFieldExtractor, InvoiceFields, KeywordSet};
pub use line_items::LineItemMatcher;

/// Trait for single-field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
