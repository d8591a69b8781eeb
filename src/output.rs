use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use anyhow::Result;

use crate::config::{PipelineConfig, CUTOFF_FORMAT};
use crate::correlate::CountryGrouping;

/// Print a summary of the run configuration before starting.
pub fn print_config_summary(config: &PipelineConfig) {
	println!("IP Geolocation Report");
	println!("=====================");
	println!("Source:         {}", config.source_path);
	match config.cutoff {
		Some(date) => println!("Since:          {}", date.format(CUTOFF_FORMAT)),
		None => println!("Since:          (all records)"),
	}
	println!("Endpoint:       {}", config.lookup.endpoint);
	println!("Batch size:     {}", config.lookup.batch_size);
	println!("Timeout:        {} ms", config.lookup.timeout.as_millis());
	println!();
}

/// Render one line per country: "<country> - [<addr>, <addr>]".
pub fn format_grouping(grouping: &CountryGrouping) -> Vec<String> {
	grouping.iter()
		.map(|(country, addrs)| format!("{} - [{}]", country, addrs.join(", ")))
		.collect()
}

pub fn print_grouping(grouping: &CountryGrouping) {
	for line in format_grouping(grouping) {
		println!("{}", line);
	}
}

/// Render the flat list of country labels, one per resolved address: "[A B]".
pub fn format_countries(countries: &[&str]) -> String {
	format!("[{}]", countries.join(" "))
}

pub fn print_countries(countries: &[&str]) {
	println!("{}", format_countries(countries));
}

/// Print address counts per country as a table, largest first.
pub fn print_count_table(grouping: &CountryGrouping) {
	let mut rows: Vec<(&str, usize)> = grouping.iter()
		.map(|(country, addrs)| (country, addrs.len()))
		.collect();
	rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(vec!["Country", "Addresses", "Share"]);

	let total = grouping.address_count();
	for (country, count) in rows {
		let share = if total > 0 {
			(count as f64 / total as f64) * 100.0
		} else {
			0.0
		};
		table.add_row(vec![
			country.to_string(),
			count.to_string(),
			format!("{:.1}%", share),
		]);
	}

	println!("\nAddresses per Country");
	println!("=====================\n");
	println!("{table}");
}

/// Write the grouping to a CSV file as `country,address` rows.
pub fn write_csv(path: &str, grouping: &CountryGrouping) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	write_grouping(&mut writer, grouping)?;
	println!("\nResults written to: {}", path);
	Ok(())
}

fn write_grouping<W: std::io::Write>(
	writer: &mut csv::Writer<W>,
	grouping: &CountryGrouping,
) -> Result<()> {
	writer.write_record(["country", "address"])?;
	for (country, addrs) in grouping.iter() {
		for addr in addrs {
			writer.write_record([country, addr.as_str()])?;
		}
	}
	writer.flush()?;
	Ok(())
}
