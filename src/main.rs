use anyhow::Context;
use clap::{Parser, ValueEnum};
use drug_info_hub::{logging, reference_links, report, Config, DrugInfoAggregator, DrugQuery, ResponseCache};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Look up a drug across public pharmaceutical data sources
#[derive(Debug, Parser)]
#[command(name = "drug-info-hub", version, about)]
struct Cli {
    /// Drug name to look up
    drug: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Query sources one at a time instead of concurrently
    #[arg(long)]
    sequential: bool,

    /// Leave out the static reference links
    #[arg(long)]
    no_links: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.sequential {
        config.aggregator.max_parallel_sources = 1;
    }

    logging::init_logging(&config.logging, cli.verbose);
    debug!("Effective configuration: {:?}", config);

    let query = DrugQuery::new(&cli.drug)?;
    let cache = Arc::new(ResponseCache::new());
    let aggregator = DrugInfoAggregator::new(&config, cache).context("failed to initialize sources")?;

    info!("Looking up {}", query);
    let bundle = aggregator.aggregate(&query).await;
    let links = if cli.no_links {
        Vec::new()
    } else {
        reference_links(&query)
    };

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&bundle, &links)),
        OutputFormat::Json => println!("{}", report::render_json(&bundle, &links)?),
    }

    Ok(())
}
