//! Rendering of extracted invoices.

use beleg_core::ExtractedInvoice;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_invoice(invoice: &ExtractedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ExtractedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "supplier",
        "date",
        "amount",
        "invoice_number",
        "source",
        "description",
        "quantity",
        "unit_price",
        "total_price",
    ])?;

    let supplier = invoice.supplier.as_deref().unwrap_or_default();
    let date = invoice.date.as_deref().unwrap_or_default();
    let amount = invoice.amount.as_deref().unwrap_or_default();
    let number = invoice.invoice_number.as_deref().unwrap_or_default();

    let header = [supplier, date, amount, number, invoice.source.label()];

    if invoice.line_items.is_empty() {
        wtr.write_record(header.iter().copied().chain(["", "", "", ""]))?;
    }

    for item in &invoice.line_items {
        wtr.write_record(header.iter().copied().chain([
            item.description.as_str(),
            item.quantity_raw.as_str(),
            item.unit_price_raw.as_str(),
            item.total_price_raw.as_str(),
        ]))?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(invoice: &ExtractedInvoice) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let mut output = String::new();

    output.push_str(&format!("Supplier: {}\n", field(&invoice.supplier)));
    output.push_str(&format!("Date:     {}\n", field(&invoice.date)));
    output.push_str(&format!("Amount:   {}\n", field(&invoice.amount)));
    if let Some(number) = &invoice.invoice_number {
        output.push_str(&format!("Number:   {}\n", number));
    }
    output.push_str(&format!("Source:   {}\n", invoice.source.label()));
    output.push('\n');

    output.push_str("Line items:\n");
    for (i, item) in invoice.line_items.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {}  {} x {} = {}\n",
            i + 1,
            item.description,
            item.quantity_raw,
            item.unit_price_raw,
            item.total_price_raw
        ));
    }

    if !invoice.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &invoice.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
