use serde::Serialize;

use crate::error::{PipelineError, Result};

/// One element of a batch lookup request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LookupQuery<'a> {
	pub query: &'a str,
	pub fields: &'a str,
}

/// A serialized request body and the addresses it asks about, in order
#[derive(Debug, Clone)]
pub struct BatchRequest {
	pub addresses: Vec<String>,
	pub body: Vec<u8>,
}

/// Serialize one batch: a JSON array of `{"query", "fields"}` objects.
///
/// Position `i` in the body always holds `addresses[i]`.
pub fn build_payload(addresses: &[String], fields: &str) -> Result<Vec<u8>> {
	let list: Vec<LookupQuery> = addresses.iter()
		.map(|addr| LookupQuery { query: addr, fields })
		.collect();
	Ok(serde_json::to_vec(&list)?)
}

/// Split the addresses into request bodies of at most `batch_size` entries.
///
/// Every address lands in exactly one batch; order is preserved across them.
pub fn build_batches(
	addresses: &[String],
	fields: &str,
	batch_size: usize,
) -> Result<Vec<BatchRequest>> {
	if batch_size == 0 {
		return Err(PipelineError::Config("batch size must be at least 1".to_string()));
	}
	addresses.chunks(batch_size)
		.map(|chunk| {
			Ok(BatchRequest {
				addresses: chunk.to_vec(),
				body: build_payload(chunk, fields)?,
			})
		})
		.collect()
}
