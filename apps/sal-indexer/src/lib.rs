//! Batch indexer: parses every benefits page under a data directory and
//! upserts the chunks into Qdrant.

use std::{fs, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sal_storage::qdrant::QdrantStore;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Directory holding the benefits pages (`*.html`).
	#[arg(long, value_name = "DIR")]
	pub data_dir: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sal_config::load(&args.config)?;

	init_tracing(&config)?;

	let store = QdrantStore::new(&config.storage.qdrant)?;

	store.ensure_collection().await?;

	let service = sal_service::SalService::new(config, store);
	let mut paths: Vec<PathBuf> = fs::read_dir(&args.data_dir)?
		.collect::<Result<Vec<_>, _>>()?
		.into_iter()
		.map(|entry| entry.path())
		.filter(|path| path.extension().is_some_and(|ext| ext == "html"))
		.collect();

	// Chunk positions double as point-id suffixes, so the file order must be
	// stable across runs.
	paths.sort();

	let mut chunks = Vec::new();

	for path in &paths {
		let html = fs::read_to_string(path)?;
		let parsed = sal_parser::parse_benefits_page(&html);

		tracing::info!(file = %path.display(), chunks = parsed.len(), "Parsed benefits page.");

		chunks.extend(parsed);
	}

	if chunks.is_empty() {
		tracing::warn!(dir = %args.data_dir.display(), "No benefit chunks found to index.");

		return Ok(());
	}

	let report = service.index_chunks(&chunks).await;

	tracing::info!(upserted = report.upserted, failed = report.failed, "Indexing complete.");

	Ok(())
}

fn init_tracing(config: &sal_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
