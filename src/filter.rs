use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::debug;

use crate::config::{LogLayout, CUTOFF_FORMAT};
use crate::error::{PipelineError, Result};
use crate::source::{field, Row};

/// Parse a cutoff date given as day-month-year ("02-01-2006").
///
/// An empty or whitespace-only value means "no cutoff" and yields `None`;
/// it is never handed to the parser.
pub fn parse_cutoff(input: &str) -> Result<Option<NaiveDate>> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Ok(None);
	}
	NaiveDate::parse_from_str(trimmed, CUTOFF_FORMAT)
		.map(Some)
		.map_err(|e| PipelineError::DateParse {
			what: "cutoff date",
			value: trimmed.to_string(),
			message: e.to_string(),
		})
}

/// Parse a row timestamp such as "Mon Jan 02 2006 15:04:05 GMT+0000 (UTC)".
///
/// The timezone marker and everything after it are cut off, the rest is
/// trimmed, and a leading weekday name is dropped when the layout says the
/// export has one.
pub fn parse_timestamp(raw: &str, layout: &LogLayout) -> Result<NaiveDateTime> {
	let text = match raw.split_once(layout.timezone_marker.as_str()) {
		Some((before, _)) if !layout.timezone_marker.is_empty() => before,
		_ => raw,
	};
	let mut text = text.trim();

	if layout.leading_weekday {
		if let Some((first, rest)) = text.split_once(char::is_whitespace) {
			if first.parse::<Weekday>().is_ok() {
				text = rest.trim_start();
			}
		}
	}

	NaiveDateTime::parse_from_str(text, &layout.timestamp_format)
		.map_err(|e| PipelineError::DateParse {
			what: "row timestamp",
			value: raw.to_string(),
			message: e.to_string(),
		})
}

/// Keep the newest rows, up to the first one older than the cutoff.
///
/// Rows must be sorted newest first. Scanning stops at the first row whose
/// timestamp falls before midnight of the cutoff date; nothing after it is
/// parsed. Without a cutoff every row is returned.
pub fn filter_by_date<'a>(
	entries: &'a [Row],
	cutoff: Option<NaiveDate>,
	layout: &LogLayout,
) -> Result<&'a [Row]> {
	let Some(cutoff) = cutoff else {
		return Ok(entries);
	};
	let threshold = cutoff.and_time(NaiveTime::MIN);

	let mut end = 0;
	for (i, row) in entries.iter().enumerate() {
		let raw = field(row, i, layout.timestamp_column)?;
		if parse_timestamp(raw, layout)? < threshold {
			break;
		}
		end = i + 1;
	}

	debug!("{} of {} rows at or after {}", end, entries.len(), cutoff);
	Ok(&entries[..end])
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(ts: &str, ip: &str) -> Row {
		vec![ts.to_string(), "_".to_string(), "_".to_string(), ip.to_string()]
	}

	fn cutoff(s: &str) -> Option<NaiveDate> {
		parse_cutoff(s).unwrap()
	}

	#[test]
	fn test_parse_cutoff() {
		let date = cutoff("02-01-2006").unwrap();
		assert_eq!(date, NaiveDate::from_ymd_opt(2006, 1, 2).unwrap());
	}

	#[test]
	fn test_empty_cutoff_means_no_filter() {
		assert_eq!(parse_cutoff("").unwrap(), None);
		assert_eq!(parse_cutoff("   ").unwrap(), None);
	}

	#[test]
	fn test_malformed_cutoff() {
		let result = parse_cutoff("2006/01/02");
		assert!(matches!(result, Err(PipelineError::DateParse { what: "cutoff date", .. })));
	}

	#[test]
	fn test_parse_timestamp_strips_timezone() {
		let layout = LogLayout::default();
		let ts = parse_timestamp(
			"Mon Jan 02 2006 15:04:05 GMT+0000 (Coordinated Universal Time)",
			&layout,
		).unwrap();
		assert_eq!(ts.to_string(), "2006-01-02 15:04:05");
	}

	#[test]
	fn test_parse_timestamp_ignores_weekday_mismatch() {
		// Jan 01 2006 was a Sunday
		let layout = LogLayout::default();
		let ts = parse_timestamp("Mon Jan 01 2006 10:00:00 GMT", &layout).unwrap();
		assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2006, 1, 1).unwrap());
	}

	#[test]
	fn test_parse_timestamp_invalid() {
		let layout = LogLayout::default();
		assert!(parse_timestamp("Date Accessed", &layout).is_err());
		assert!(parse_timestamp("2006-01-02 10:00:00", &layout).is_err());
	}

	#[test]
	fn test_filter_keeps_rows_on_cutoff_day() {
		let layout = LogLayout::default();
		let rows = vec![
			entry("Mon Jan 02 2006 10:00:00 GMT", "1.2.3.4"),
			entry("Mon Jan 01 2006 10:00:00 GMT", "5.6.7.8"),
		];
		let kept = filter_by_date(&rows, cutoff("02-01-2006"), &layout).unwrap();
		assert_eq!(kept.len(), 1);
		assert_eq!(kept[0][3], "1.2.3.4");
	}

	#[test]
	fn test_filter_midnight_is_inclusive() {
		let layout = LogLayout::default();
		let rows = vec![
			entry("Mon Jan 02 2006 00:00:00 GMT", "1.2.3.4"),
			entry("Sun Jan 01 2006 23:59:59 GMT", "5.6.7.8"),
		];
		let kept = filter_by_date(&rows, cutoff("02-01-2006"), &layout).unwrap();
		assert_eq!(kept.len(), 1);
	}

	#[test]
	fn test_filter_stops_at_first_older_row() {
		let layout = LogLayout::default();
		let base = vec![
			entry("Wed Jan 04 2006 10:00:00 GMT", "1.1.1.1"),
			entry("Tue Jan 03 2006 10:00:00 GMT", "2.2.2.2"),
			entry("Sun Jan 01 2006 10:00:00 GMT", "3.3.3.3"),
		];
		let mut extended = base.clone();
		// Older rows, including ones that would not even parse, are never looked at
		extended.push(entry("Sat Dec 31 2005 10:00:00 GMT", "4.4.4.4"));
		extended.push(entry("not a timestamp", "5.5.5.5"));

		let c = cutoff("02-01-2006");
		let a = filter_by_date(&base, c, &layout).unwrap();
		let b = filter_by_date(&extended, c, &layout).unwrap();
		assert_eq!(a, b);
		assert_eq!(a.len(), 2);
	}

	#[test]
	fn test_filter_all_newer() {
		let layout = LogLayout::default();
		let rows = vec![
			entry("Wed Jan 04 2006 10:00:00 GMT", "1.1.1.1"),
			entry("Tue Jan 03 2006 10:00:00 GMT", "2.2.2.2"),
		];
		let kept = filter_by_date(&rows, cutoff("01-01-2006"), &layout).unwrap();
		assert_eq!(kept.len(), 2);
	}

	#[test]
	fn test_filter_without_cutoff_passes_everything() {
		let layout = LogLayout::default();
		let rows = vec![
			entry("not parsed at all", "1.1.1.1"),
			entry("Tue Jan 03 2006 10:00:00 GMT", "2.2.2.2"),
		];
		let kept = filter_by_date(&rows, None, &layout).unwrap();
		assert_eq!(kept.len(), 2);
	}

	#[test]
	fn test_filter_malformed_row_timestamp() {
		let layout = LogLayout::default();
		let rows = vec![
			entry("Wed Jan 04 2006 10:00:00 GMT", "1.1.1.1"),
			entry("yesterday", "2.2.2.2"),
		];
		let result = filter_by_date(&rows, cutoff("02-01-2006"), &layout);
		assert!(matches!(result, Err(PipelineError::DateParse { what: "row timestamp", .. })));
	}

	#[test]
	fn test_filter_short_row_is_source_error() {
		let layout = LogLayout {
			timestamp_column: 4,
			..LogLayout::default()
		};
		let mut newest = entry("_", "1.1.1.1");
		newest.push("Wed Jan 04 2006 10:00:00 GMT".to_string());
		let rows = vec![newest, entry("_", "2.2.2.2")];
		let result = filter_by_date(&rows, cutoff("02-01-2006"), &layout);
		assert!(matches!(result, Err(PipelineError::SourceRead(_))));
	}

	#[test]
	fn test_filter_empty_input() {
		let layout = LogLayout::default();
		let kept = filter_by_date(&[], cutoff("02-01-2006"), &layout).unwrap();
		assert!(kept.is_empty());
	}
}
