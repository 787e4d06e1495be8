//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use beleg_core::{create_producer, InvoiceEngine};

use super::output::{format_invoice, OutputFormat};
use super::{extract_file, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text or PDF, or a saved LLM response with --llm)
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as a vision-model response instead of a document
    #[arg(long)]
    llm: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let engine = InvoiceEngine::new(&config.extraction)?;
    let producer = create_producer(&config.producer);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(if args.llm {
        "Parsing LLM response...".to_string()
    } else {
        format!("Reading text ({})...", producer.name())
    });

    let result = extract_file(&args.input, args.llm, &engine, producer.as_ref());
    pb.finish_and_clear();
    let invoice = result?;

    if invoice.needs_manual_review() {
        eprintln!(
            "{} No invoice data recognized in {}; enter it manually.",
            style("⚠").yellow(),
            args.input.display()
        );
    }

    let output = format_invoice(&invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
