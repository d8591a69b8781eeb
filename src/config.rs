use std::time::Duration;

use chrono::NaiveDate;

/// Default path of the access-log export
pub const DEFAULT_SOURCE_PATH: &str = "access_logs.csv";
/// Batch endpoint of the geolocation service
pub const DEFAULT_ENDPOINT: &str = "http://ip-api.com/batch";
/// Fields requested per address; `query` makes the service echo the address
pub const DEFAULT_FIELDS: &str = "country,query";
/// Label used for addresses the service could not place in a country
pub const DEFAULT_PRIVATE_LABEL: &str = "Private IP";
/// ip-api accepts at most 100 queries per batch request
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_TIMESTAMP_COLUMN: usize = 0;
pub const DEFAULT_IP_COLUMN: usize = 3;
pub const DEFAULT_TIMEZONE_MARKER: &str = "GMT";
/// Row timestamps look like "Mon Jan 02 2006 15:04:05"; the weekday name is
/// dropped before parsing, so it is not part of the format
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S";
/// Cutoff dates are day-month-year, e.g. "02-01-2006"
pub const CUTOFF_FORMAT: &str = "%d-%m-%Y";

/// Where the interesting fields live in each exported row
#[derive(Debug, Clone)]
pub struct LogLayout {
	pub timestamp_column: usize,
	pub ip_column: usize,
	/// Everything from this marker onward is dropped before parsing a timestamp
	pub timezone_marker: String,
	pub timestamp_format: String,
	/// Timestamps start with a weekday name that is ignored when parsing
	pub leading_weekday: bool,
}

impl LogLayout {
	/// Number of fields a row needs before it can be treated as data.
	pub fn min_fields(&self) -> usize {
		self.timestamp_column.max(self.ip_column) + 1
	}
}

impl Default for LogLayout {
	fn default() -> Self {
		Self {
			timestamp_column: DEFAULT_TIMESTAMP_COLUMN,
			ip_column: DEFAULT_IP_COLUMN,
			timezone_marker: DEFAULT_TIMEZONE_MARKER.to_string(),
			timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
			leading_weekday: true,
		}
	}
}

/// Settings for talking to the batch geolocation service
#[derive(Debug, Clone)]
pub struct LookupConfig {
	pub endpoint: String,
	pub fields: String,
	pub private_label: String,
	pub batch_size: usize,
	pub timeout: Duration,
}

impl Default for LookupConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			fields: DEFAULT_FIELDS.to_string(),
			private_label: DEFAULT_PRIVATE_LABEL.to_string(),
			batch_size: DEFAULT_BATCH_SIZE,
			timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
		}
	}
}

/// Everything one run of the pipeline needs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
	pub source_path: String,
	pub cutoff: Option<NaiveDate>,
	pub layout: LogLayout,
	pub lookup: LookupConfig,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			source_path: DEFAULT_SOURCE_PATH.to_string(),
			cutoff: None,
			layout: LogLayout::default(),
			lookup: LookupConfig::default(),
		}
	}
}
