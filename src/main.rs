use chrono::{NaiveDate, Utc};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tarifa::application::engine::PricingEngine;
use tarifa::domain::ports::{
    ClientDirectoryBox, ProductCatalogBox, TariffRepositoryBox, TaxRepositoryBox,
};
use tarifa::interfaces::csv::breakdown_writer::BreakdownWriter;
use tarifa::interfaces::csv::line_reader::LineReader;
use tarifa::interfaces::snapshot::RuleSnapshot;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rule snapshot JSON file
    snapshot: PathBuf,

    /// Input price lines CSV file
    lines: PathBuf,

    /// Effective date for rule windows (defaults to today, UTC)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());

    // One snapshot load backs the whole batch, so every line in this run is
    // priced against the same rule set.
    let data = RuleSnapshot::from_path(&cli.snapshot)
        .into_diagnostic()?
        .into_dataset();

    let clients: ClientDirectoryBox = Box::new(data.clone());
    let catalog: ProductCatalogBox = Box::new(data.clone());
    let tariffs: TariffRepositoryBox = Box::new(data.clone());
    let taxes: TaxRepositoryBox = Box::new(data);
    let engine = PricingEngine::new(clients, catalog, tariffs, taxes);

    let file = File::open(cli.lines).into_diagnostic()?;
    let reader = LineReader::new(file);

    let stdout = io::stdout();
    let mut writer = BreakdownWriter::new(stdout.lock());
    for line_result in reader.lines() {
        match line_result {
            Ok(line) => {
                let breakdown = engine.resolve_price(&line.into_request(as_of)).await;
                writer.write_breakdown(&breakdown).into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading line: {}", e);
            }
        }
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
