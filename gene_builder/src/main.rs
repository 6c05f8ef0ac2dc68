// src/main.rs

mod annotate;
mod api_handler;
mod audit;
mod cds;
mod config;
mod dedup;
mod ensembl;
mod error;
mod exon_map;
mod genbank;
mod models;
mod pipeline;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::ensembl::EnsemblClient;
use crate::pipeline::process_gene;

/// Extract gene sequences from Ensembl and generate GenBank files with
/// consistent exon numbering across splice variants.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Gene symbol to extract (e.g. "lrfn1", "nrxn1a")
    gene_symbol: String,

    /// Species name
    #[arg(long, default_value = config::DEFAULT_SPECIES)]
    species: String,

    /// Output directory for GenBank files
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Only output the canonical transcript(s)
    #[arg(long)]
    canonical_only: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        species: cli.species,
        canonical_only: cli.canonical_only,
        output_dir: cli.output_dir,
        ..Config::default()
    };

    let client = EnsemblClient::new(&config)?;
    let generated = process_gene(&client, &config, &cli.gene_symbol)?;

    info!("generated {} file(s)", generated.len());
    for file in &generated {
        info!(
            "  {}: {} ({} bp, {} features)",
            file.transcript_name,
            file.path.display(),
            file.sequence_length,
            file.feature_count
        );
    }

    Ok(())
}
