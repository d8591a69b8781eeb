use std::collections::HashSet;

use crate::config::LogLayout;
use crate::error::Result;
use crate::source::{field, Row};

/// Reduce a sequence of addresses to its distinct values, first-seen order.
///
/// `exclude` is the header's label for the IP column; it is dropped if it
/// shows up among the values. Empty fields are skipped.
pub fn unique_addresses<'a, I>(addresses: I, exclude: Option<&str>) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut seen: HashSet<&str> = HashSet::new();
	let mut unique = Vec::new();
	for addr in addresses {
		let addr = addr.trim();
		if addr.is_empty() || Some(addr) == exclude {
			continue;
		}
		if seen.insert(addr) {
			unique.push(addr.to_string());
		}
	}
	unique
}

/// Collect the distinct client addresses of the given data rows.
///
/// A row without the IP column is a SourceRead error.
pub fn unique_row_addresses(
	rows: &[Row],
	layout: &LogLayout,
	header_label: Option<&str>,
) -> Result<Vec<String>> {
	let addresses = rows.iter()
		.enumerate()
		.map(|(i, row)| field(row, i, layout.ip_column))
		.collect::<Result<Vec<&str>>>()?;
	Ok(unique_addresses(addresses, header_label))
}
