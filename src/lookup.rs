use log::{debug, info};
use reqwest::header::CONTENT_TYPE;

use crate::config::LookupConfig;
use crate::correlate::{correlate, parse_results, Resolved};
use crate::error::{PipelineError, Result};
use crate::payload::{build_batches, BatchRequest};

/// Client for the batch geolocation endpoint.
///
/// Sends one POST per batch and waits for it before sending the next.
pub struct LookupClient {
	http: reqwest::Client,
	config: LookupConfig,
}

impl LookupClient {
	pub fn new(config: LookupConfig) -> Result<Self> {
		let http = reqwest::Client::builder()
			.timeout(config.timeout)
			.build()
			.map_err(|e| PipelineError::Transport(format!("failed to create HTTP client: {}", e)))?;
		Ok(Self { http, config })
	}

	/// POST one serialized batch and return the raw response body.
	///
	/// A non-2xx status is a transport failure; its body is not inspected.
	pub async fn send_batch(&self, body: Vec<u8>) -> Result<Vec<u8>> {
		let response = self.http
			.post(&self.config.endpoint)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(|e| PipelineError::Transport(format!("failed to make request: {}", e)))?;

		let status = response.status();
		debug!("lookup service answered {}", status);
		if !status.is_success() {
			return Err(PipelineError::Transport(format!(
				"lookup service returned HTTP {}", status,
			)));
		}

		let bytes = response.bytes()
			.await
			.map_err(|e| PipelineError::Transport(format!("failed to read response body: {}", e)))?;
		Ok(bytes.to_vec())
	}

	/// Send one batch and pair every result with its address.
	pub async fn resolve_batch(&self, batch: &BatchRequest) -> Result<Vec<Resolved>> {
		let body = self.send_batch(batch.body.clone()).await?;
		let results = parse_results(&body)?;
		correlate(&batch.addresses, results, &self.config.private_label)
	}

	/// Resolve every address, splitting into batches of the configured size.
	///
	/// Results come back in submission order (or echo order within a batch).
	pub async fn resolve_all(&self, addresses: &[String]) -> Result<Vec<Resolved>> {
		let batches = build_batches(addresses, &self.config.fields, self.config.batch_size)?;
		info!(
			"resolving {} addresses in {} request(s) to {}",
			addresses.len(), batches.len(), self.config.endpoint,
		);

		let mut resolved = Vec::with_capacity(addresses.len());
		for (i, batch) in batches.iter().enumerate() {
			debug!("batch {}/{}: {} addresses", i + 1, batches.len(), batch.addresses.len());
			resolved.extend(self.resolve_batch(batch).await?);
		}
		Ok(resolved)
	}
}
