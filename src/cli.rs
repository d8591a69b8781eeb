use std::time::Duration;

use clap::Parser;

use crate::config::{
	LogLayout, LookupConfig, PipelineConfig, DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT,
	DEFAULT_FIELDS, DEFAULT_PRIVATE_LABEL, DEFAULT_SOURCE_PATH, DEFAULT_TIMEOUT_MS,
};
use crate::error::{PipelineError, Result};
use crate::filter::parse_cutoff;

/// Group the client IPs of an access-log export by country
#[derive(Parser, Debug)]
#[command(name = "ip-geo-report")]
#[command(about = "Resolve the distinct client IPs of an access-log CSV export to countries")]
pub struct Cli {
	/// CSV export with the access logs
	#[arg(short = 'f', long = "file", default_value = DEFAULT_SOURCE_PATH)]
	pub file: String,

	/// Only count records on or after this date (DD-MM-YYYY)
	#[arg(short = 'd', long = "date", default_value = "")]
	pub date: String,

	/// Batch geolocation endpoint
	#[arg(long = "endpoint", default_value = DEFAULT_ENDPOINT)]
	pub endpoint: String,

	/// Maximum number of addresses per lookup request
	#[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
	pub batch_size: usize,

	/// Lookup request timeout in milliseconds
	#[arg(short = 't', long = "timeout", default_value_t = DEFAULT_TIMEOUT_MS)]
	pub timeout: u64,

	/// Label for addresses the service cannot place in a country
	#[arg(long = "private-label", default_value = DEFAULT_PRIVATE_LABEL)]
	pub private_label: String,

	/// Print only the list of countries, one per distinct address
	#[arg(long = "countries-only")]
	pub countries_only: bool,

	/// Also print a table of address counts per country
	#[arg(long = "table")]
	pub table: bool,

	/// Output CSV file path
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,

	/// Increase log verbosity (repeatable)
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	/// Build the pipeline configuration, parsing the cutoff date up front.
	pub fn pipeline_config(&self) -> Result<PipelineConfig> {
		if self.batch_size == 0 {
			return Err(PipelineError::Config("--batch-size must be at least 1".to_string()));
		}
		Ok(PipelineConfig {
			source_path: self.file.clone(),
			cutoff: parse_cutoff(&self.date)?,
			layout: LogLayout::default(),
			lookup: LookupConfig {
				endpoint: self.endpoint.clone(),
				fields: DEFAULT_FIELDS.to_string(),
				private_label: self.private_label.clone(),
				batch_size: self.batch_size,
				timeout: Duration::from_millis(self.timeout),
			},
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let cli = Cli::parse_from(["ip-geo-report"]);
		let config = cli.pipeline_config().unwrap();
		assert_eq!(config.source_path, "access_logs.csv");
		assert!(config.cutoff.is_none());
		assert_eq!(config.lookup.endpoint, "http://ip-api.com/batch");
		assert_eq!(config.lookup.private_label, "Private IP");
		assert_eq!(config.lookup.batch_size, 100);
	}

	#[test]
	fn test_flags() {
		let cli = Cli::parse_from([
			"ip-geo-report", "-f", "slack.csv", "-d", "02-01-2006",
			"--batch-size", "50", "--endpoint", "http://localhost:8080/batch", "-vv",
		]);
		let config = cli.pipeline_config().unwrap();
		assert_eq!(config.source_path, "slack.csv");
		assert_eq!(config.cutoff.unwrap().to_string(), "2006-01-02");
		assert_eq!(config.lookup.batch_size, 50);
		assert_eq!(config.lookup.endpoint, "http://localhost:8080/batch");
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn test_zero_batch_size_rejected() {
		let cli = Cli::parse_from(["ip-geo-report", "--batch-size", "0"]);
		assert!(matches!(cli.pipeline_config(), Err(PipelineError::Config(_))));
	}

	#[test]
	fn test_bad_date_rejected() {
		let cli = Cli::parse_from(["ip-geo-report", "--date", "2006/01/02"]);
		assert!(matches!(cli.pipeline_config(), Err(PipelineError::DateParse { .. })));
	}
}
