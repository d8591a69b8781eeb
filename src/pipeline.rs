use log::info;

use crate::config::PipelineConfig;
use crate::correlate::{CountryGrouping, Resolved};
use crate::dedup::unique_row_addresses;
use crate::error::Result;
use crate::filter::filter_by_date;
use crate::lookup::LookupClient;
use crate::source::{load_table, LogTable};

/// Outcome of one run: every resolved address plus the per-country grouping
#[derive(Debug, Clone, Default)]
pub struct Report {
	/// One entry per distinct address, in lookup order
	pub resolved: Vec<Resolved>,
	pub grouping: CountryGrouping,
}

impl Report {
	/// Country label of every resolved address, in lookup order.
	pub fn countries(&self) -> Vec<&str> {
		self.resolved.iter().map(|r| r.country.as_str()).collect()
	}
}

/// Filter an already loaded export by date and reduce it to distinct addresses.
pub fn distinct_addresses(table: &LogTable, config: &PipelineConfig) -> Result<Vec<String>> {
	let layout = &config.layout;
	let kept = filter_by_date(&table.entries, config.cutoff, layout)?;
	if let Some(cutoff) = config.cutoff {
		info!("{} of {} rows on or after {}", kept.len(), table.entries.len(), cutoff);
	}
	unique_row_addresses(kept, layout, table.ip_label(layout))
}

/// Run the whole pipeline: read, filter, deduplicate, look up, group.
///
/// Stops at the first failure; nothing is returned for a partial run.
pub async fn run(config: &PipelineConfig) -> Result<Report> {
	let table = load_table(&config.source_path, &config.layout)?;
	let addresses = distinct_addresses(&table, config)?;

	println!("Looking up {} distinct IP addresses...", addresses.len());
	if addresses.is_empty() {
		return Ok(Report::default());
	}

	let client = LookupClient::new(config.lookup.clone())?;
	let resolved = client.resolve_all(&addresses).await?;
	let grouping: CountryGrouping = resolved.iter().collect();
	let unresolved = grouping.get(&config.lookup.private_label).map_or(0, |a| a.len());
	info!(
		"{} addresses in {} groups, {} unresolved",
		grouping.address_count(), grouping.len(), unresolved,
	);
	Ok(Report { resolved, grouping })
}
