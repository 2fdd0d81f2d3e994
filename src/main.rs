use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardex::config::CardexConfig;
use cardex::pipeline;

#[derive(Parser)]
#[command(name = "cardex", version, about = "Card ingestion pipeline for vector search")]
struct Cli {
    /// Config file path (defaults to ~/.cardex/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one ingestion pass over the configured bulk source
    Ingest {
        /// Load and filter only — no enrichment or upload calls
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CardexConfig::load_from(path)?,
        None => CardexConfig::load()?,
    };

    // Log to stderr so stdout stays clean for the summary output.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Ingest { dry_run } => {
            if dry_run {
                let cards = pipeline::loader::load_cards(&config.resolved_source_path())?;
                let loaded = cards.len();
                let outcome = pipeline::filter::filter_eligible(cards);
                println!(
                    "loaded {loaded} records: {} eligible, {} tokens, {} without text or keywords, {} duplicate printings",
                    outcome.eligible.len(),
                    outcome.dropped_tokens,
                    outcome.dropped_empty,
                    outcome.dropped_duplicates
                );
                return Ok(());
            }

            let cancel = pipeline::cancel_flag();
            let flag = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("cancellation requested, in-flight records will finish");
                    flag.store(true, Ordering::Relaxed);
                }
            });

            let summary = pipeline::run_ingestion(&config, cancel).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
