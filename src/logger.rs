use std::io::Write;

use log::LevelFilter;

/// Map the number of `-v` flags onto a log level.
pub fn level_for(verbosity: u8) -> LevelFilter {
	match verbosity {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

/// Initialize `env_logger` on stderr.
///
/// `RUST_LOG` is read first; an explicit `-v` raises this crate's level on
/// top of it. HTTP internals stay at warn unless `RUST_LOG` asks otherwise.
pub fn init_logger(verbosity: u8) {
	let mut builder = env_logger::Builder::new();
	builder.filter_level(LevelFilter::Warn);
	builder.filter_module("hyper", LevelFilter::Warn);
	builder.filter_module("reqwest", LevelFilter::Warn);
	builder.parse_default_env();
	if verbosity > 0 {
		builder.filter_module("ip_geo_report", level_for(verbosity));
	}

	builder.format(|buf, record| {
		writeln!(buf, "[{}] {}", record.level(), record.args())
	});

	// Only fails if a logger is already installed
	let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_verbosity_levels() {
		assert_eq!(level_for(0), LevelFilter::Warn);
		assert_eq!(level_for(1), LevelFilter::Info);
		assert_eq!(level_for(2), LevelFilter::Debug);
		assert_eq!(level_for(9), LevelFilter::Trace);
	}

	#[test]
	fn test_init_twice_is_harmless() {
		init_logger(0);
		init_logger(2);
	}
}
