mod cli;
mod config;
mod correlate;
mod dedup;
mod error;
mod filter;
mod logger;
mod lookup;
mod output;
mod payload;
mod pipeline;
mod source;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logger::init_logger(cli.verbose);

	// Fails early on a malformed --date, before touching the file
	let config = cli.pipeline_config()?;

	if !cli.countries_only {
		output::print_config_summary(&config);
	}

	let report = pipeline::run(&config).await?;

	if cli.countries_only {
		output::print_countries(&report.countries());
	} else if report.grouping.is_empty() {
		println!("No addresses to report");
	} else {
		output::print_grouping(&report.grouping);
	}

	if cli.table {
		output::print_count_table(&report.grouping);
	}

	// Write CSV if requested
	if let Some(path) = &cli.output {
		output::write_csv(path, &report.grouping)?;
	}

	Ok(())
}
