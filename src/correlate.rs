use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// One element of a batch lookup response
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LookupResult {
	/// Empty or missing when the service could not place the address
	#[serde(default)]
	pub country: String,
	/// Echo of the submitted address, present when "query" was requested
	#[serde(default)]
	pub query: Option<String>,
	/// Reason given by the service when it could not resolve the address
	#[serde(default)]
	pub message: Option<String>,
}

/// An address paired with the label it is grouped under
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
	pub address: String,
	pub country: String,
}

/// Deserialize a raw response body into its per-address results.
pub fn parse_results(body: &[u8]) -> Result<Vec<LookupResult>> {
	serde_json::from_slice(body)
		.map_err(|e| PipelineError::ResponseParse(format!("unexpected response body: {}", e)))
}

/// Pair each result with the address it answers.
///
/// The service must return exactly one result per submitted address. When
/// every result echoes its address that echo is used, and the echoes must
/// be the submitted addresses in some order: an unknown or repeated echo is
/// an error. Otherwise results are matched to `submitted` by position.
/// Results without a country get `private_label`.
pub fn correlate(
	submitted: &[String],
	results: Vec<LookupResult>,
	private_label: &str,
) -> Result<Vec<Resolved>> {
	if results.len() != submitted.len() {
		return Err(PipelineError::ResponseParse(format!(
			"expected {} results, got {}",
			submitted.len(), results.len(),
		)));
	}
	let echoed = results.iter().all(|r| r.query.is_some());
	if echoed {
		check_echoes(submitted, &results)?;
	}

	let resolved = results.into_iter()
		.enumerate()
		.map(|(i, result)| {
			if result.country.trim().is_empty() {
				if let Some(message) = &result.message {
					debug!("lookup for result {} failed: {}", i, message);
				}
			}
			let country = match result.country.trim() {
				"" => private_label.to_string(),
				c => c.to_string(),
			};
			let address = match result.query {
				Some(q) if echoed => q,
				_ => submitted[i].clone(),
			};
			Resolved { address, country }
		})
		.collect();
	Ok(resolved)
}

/// Every echoed address must take exactly one submitted address.
fn check_echoes(submitted: &[String], results: &[LookupResult]) -> Result<()> {
	let mut pending: HashSet<&str> = submitted.iter().map(|s| s.as_str()).collect();
	for echo in results.iter().filter_map(|r| r.query.as_deref()) {
		if !pending.remove(echo) {
			let reason = if submitted.iter().any(|s| s == echo) {
				"echoed more than once"
			} else {
				"was never submitted"
			};
			return Err(PipelineError::ResponseParse(format!(
				"result for '{}' {}", echo, reason,
			)));
		}
	}
	Ok(())
}

/// Addresses grouped by country label.
///
/// Labels iterate in sorted order; each list keeps first-seen order and never
/// holds the same address twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryGrouping {
	groups: BTreeMap<String, Vec<String>>,
	seen: HashSet<String>,
}

impl CountryGrouping {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an address under a label. Returns false if the address was already grouped.
	pub fn insert(&mut self, country: &str, address: &str) -> bool {
		if !self.seen.insert(address.to_string()) {
			return false;
		}
		self.groups
			.entry(country.to_string())
			.or_default()
			.push(address.to_string());
		true
	}

	pub fn extend<'a, I>(&mut self, resolved: I)
	where
		I: IntoIterator<Item = &'a Resolved>,
	{
		for r in resolved {
			self.insert(&r.country, &r.address);
		}
	}

	pub fn get(&self, country: &str) -> Option<&[String]> {
		self.groups.get(country).map(|v| v.as_slice())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Number of country labels
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Total number of grouped addresses
	pub fn address_count(&self) -> usize {
		self.seen.len()
	}
}

impl<'a> FromIterator<&'a Resolved> for CountryGrouping {
	fn from_iter<I: IntoIterator<Item = &'a Resolved>>(iter: I) -> Self {
		let mut grouping = CountryGrouping::new();
		grouping.extend(iter);
		grouping
	}
}
