use thiserror::Error;

/// Every way a run can fail. None of these are recoverable; the run aborts.
#[derive(Error, Debug)]
pub enum PipelineError {
	/// Source file missing, unreadable, not valid CSV, or a data row too short
	#[error("failed to read records: {0}")]
	SourceRead(String),

	/// Cutoff date or row timestamp did not match the expected format
	#[error("failed to parse {what} '{value}': {message}")]
	DateParse {
		what: &'static str,
		value: String,
		message: String,
	},

	#[error("failed to prepare request payload: {0}")]
	Payload(#[from] serde_json::Error),

	/// Connection failure, timeout, or a non-2xx status from the lookup service
	#[error("failed to get location by IPs list: {0}")]
	Transport(String),

	#[error("failed to parse lookup response: {0}")]
	ResponseParse(String),

	#[error("invalid configuration: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
