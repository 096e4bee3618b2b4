use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sal_api::Args::parse();

	sal_api::run(args).await
}
