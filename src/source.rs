use log::debug;

use crate::config::LogLayout;
use crate::error::{PipelineError, Result};
use crate::filter::parse_timestamp;

/// One exported log row, fields in column order
pub type Row = Vec<String>;

/// Rows of an export with the header and footer separated from the data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogTable {
	pub header: Option<Row>,
	/// Data rows, newest first
	pub entries: Vec<Row>,
	pub footer: Option<Row>,
}

impl LogTable {
	/// Label the header gives the IP column, if there is a header.
	pub fn ip_label(&self, layout: &LogLayout) -> Option<&str> {
		self.header.as_ref()
			.and_then(|h| h.get(layout.ip_column))
			.map(|s| s.as_str())
	}
}

/// Read every row of a comma-separated file.
///
/// Rows may differ in length (exports end with a short footer line).
pub fn read_rows(path: &str) -> Result<Vec<Row>> {
	let source_err = |message: String| {
		PipelineError::SourceRead(format!("'{}': {}", path, message))
	};

	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_path(path)
		.map_err(|e| source_err(e.to_string()))?;

	let mut rows = Vec::new();
	for record in reader.records() {
		let record = record.map_err(|e| source_err(e.to_string()))?;
		rows.push(record.iter().map(String::from).collect());
	}
	debug!("read {} rows from {}", rows.len(), path);
	Ok(rows)
}

/// Field `column` of data row `index`, or a SourceRead error if the row is too short.
pub fn field(row: &Row, index: usize, column: usize) -> Result<&str> {
	row.get(column)
		.map(|s| s.as_str())
		.ok_or_else(|| PipelineError::SourceRead(format!(
			"data row {} has {} fields, expected column {}",
			index + 1, row.len(), column,
		)))
}

/// True if the row has the configured columns and a parseable timestamp.
fn looks_like_data(row: &Row, layout: &LogLayout) -> bool {
	if row.len() < layout.min_fields() {
		return false;
	}
	parse_timestamp(&row[layout.timestamp_column], layout).is_ok()
}

/// Separate the header and footer from the data rows.
///
/// Only the first and last rows are candidates: each is set aside when it
/// does not look like a data row. Every row in between is data, so a
/// malformed inner row surfaces later as a parse error instead of being
/// silently dropped. Inputs with zero, one or two rows are fine.
pub fn split_table(mut rows: Vec<Row>, layout: &LogLayout) -> LogTable {
	let header = if rows.first().is_some_and(|r| !looks_like_data(r, layout)) {
		Some(rows.remove(0))
	} else {
		None
	};
	let footer = if rows.last().is_some_and(|r| !looks_like_data(r, layout)) {
		rows.pop()
	} else {
		None
	};

	if header.is_some() || footer.is_some() {
		debug!(
			"set aside header: {}, footer: {}",
			header.is_some(), footer.is_some(),
		);
	}
	LogTable { header, entries: rows, footer }
}

/// Read and split an export in one step.
pub fn load_table(path: &str, layout: &LogLayout) -> Result<LogTable> {
	let rows = read_rows(path)?;
	let table = split_table(rows, layout);
	if let Some(footer) = &table.footer {
		debug!("ignoring footer row: {}", footer.join(","));
	}
	Ok(table)
}
