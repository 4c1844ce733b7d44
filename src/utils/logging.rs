//! Logging utilities for the application
//!
//! Sets up `tracing_subscriber` with an environment driven filter (`RUST_LOG`, default `info`).
//!
//! Output goes to stdout unless `LOG_MODE=file`, in which case a daily rolling file is
//! written under `LOG_DATA_DIR` (default `logs/`).
use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "oilseed-ledger.log";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
	Stdout,
	File { directory: String },
}

impl LogMode {
	/// Reads `LOG_MODE` and `LOG_DATA_DIR` from the environment.
	pub fn from_env() -> Self {
		match env::var("LOG_MODE") {
			Ok(mode) if mode.eq_ignore_ascii_case("file") => Self::File {
				directory: env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string()),
			},
			_ => Self::Stdout,
		}
	}
}

/// Setup logging for the application
///
/// Returns the guard of the non-blocking file writer when logging to a file. The guard
/// must be held for the lifetime of the process, otherwise buffered lines are lost.
pub fn setup_logging(mode: LogMode) -> Option<WorkerGuard> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	match mode {
		LogMode::Stdout => {
			let subscriber = tracing_subscriber::registry().with(filter).with(
				fmt::layer()
					.with_writer(std::io::stdout)
					.event_format(
						fmt::format()
							.with_level(true)
							.with_target(true)
							.with_thread_ids(false)
							.with_thread_names(false)
							.with_ansi(true)
							.compact(),
					)
					.fmt_fields(fmt::format::PrettyFields::new()),
			);

			// Try to set the subscriber, but don't panic if it fails
			let _ = subscriber.try_init();
			None
		}
		LogMode::File { directory } => {
			let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
			let (writer, guard) = tracing_appender::non_blocking(appender);

			let subscriber = tracing_subscriber::registry().with(filter).with(
				fmt::layer()
					.with_writer(writer)
					.with_ansi(false)
					.with_target(true),
			);

			let _ = subscriber.try_init();
			Some(guard)
		}
	}
}
