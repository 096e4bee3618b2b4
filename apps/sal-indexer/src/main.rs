use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sal_indexer::Args::parse();

	sal_indexer::run(args).await
}
