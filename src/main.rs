//! Command-line interface for ebdx.
//!
//! A thin shim over the library crate: reads one `.docx`, prints its EBDs
//! in the requested export format.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ebdx::config::ExtractorConfig;
use ebdx::document::{generate_outline, load_extraction, records_for_role, search_extraction};
use ebdx::export::export_extraction;
use ebdx::{ExportFormat, Extraction, Role};

#[derive(Parser, Debug)]
#[command(name = "ebdx", version, about = "Extract EBD decision tables from BDEW .docx documents")]
struct Cli {
    /// Path to the .docx file
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    export: ExportFormat,

    /// Only keep EBDs checked by this role (NB, LF, MSB, BIKO, BTR)
    #[arg(short, long)]
    role: Option<Role>,

    /// Print matches for a case-insensitive search instead of exporting
    #[arg(short, long)]
    search: Option<String>,

    /// Print one line per EBD instead of exporting
    #[arg(long)]
    outline: bool,

    /// Read extractor settings from this TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Log diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.init_config {
        ExtractorConfig::init_default()?;
        if let Some(path) = ExtractorConfig::get_config_path() {
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let Some(file) = cli.file.as_deref() else {
        anyhow::bail!("No input file given. Usage: ebdx <FILE.docx>");
    };

    let config = match &cli.config {
        Some(path) => ExtractorConfig::load_from(path)?,
        None => ExtractorConfig::load()?,
    };

    let mut extraction = load_extraction(file, &config).await?;
    if let Some(role) = cli.role {
        extraction = filter_role(&extraction, role);
    }

    if let Some(query) = &cli.search {
        for hit in search_extraction(&extraction, query) {
            let record = &extraction.records[hit.record_index];
            println!("{} [{:?}]: {}", record.title, hit.location, hit.text);
        }
    } else if cli.outline {
        for item in generate_outline(&extraction) {
            println!("{} [{}] {} steps", item.title, item.role, item.step_count);
        }
    } else {
        print!("{}", export_extraction(&extraction, &cli.export)?);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "ebdx=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn filter_role(extraction: &Extraction, role: Role) -> Extraction {
    let records: Vec<_> = records_for_role(extraction, role)
        .into_iter()
        .cloned()
        .collect();
    let steps = records
        .iter()
        .filter_map(|record| {
            extraction
                .steps
                .get(&record.id)
                .map(|steps| (record.id.clone(), steps.clone()))
        })
        .collect();
    Extraction { records, steps }
}
