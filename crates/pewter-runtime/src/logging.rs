//! Logging setup for Pewter.
//!
//! The global `tracing` subscriber is built from the `[logging]` section of
//! [`PewterConfig`](crate::PewterConfig):
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "compact"
//! output = "stderr"
//!
//! [logging.filters]
//! pewter_framework = "trace"
//!
//! [logging.span_events]
//! new = true
//! close = true
//! ```
//!
//! Every dispatch runs in a `dispatch` span, so enabling `new` and `close`
//! span events shows how long each message took.
//!
//! ```rust,ignore
//! let config = pewter_runtime::config::load_config()?;
//! pewter_runtime::logging::init_from_config(&config.logging);
//! ```

use std::ffi::OsStr;
use std::path::Path;

use tracing::warn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = try_init(config);
}

/// Installs the global subscriber, failing if one is already installed.
pub fn try_init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config);
    let span_events = fmt_span(&config.span_events);

    macro_rules! layer {
        ($layer:expr) => {
            $layer
                .with_span_events(span_events)
                .with_thread_ids(config.thread_ids)
                .with_file(config.file_location)
                .with_line_number(config.file_location)
        };
    }

    macro_rules! install {
        ($writer:expr) => {
            match config.format {
                #[cfg(feature = "json-log")]
                LogFormat::Json => tracing_subscriber::registry()
                    .with(layer!(fmt::layer().json().with_writer($writer)))
                    .with(filter)
                    .try_init(),
                #[cfg(not(feature = "json-log"))]
                LogFormat::Json => {
                    let result = tracing_subscriber::registry()
                        .with(layer!(fmt::layer().with_writer($writer)))
                        .with(filter)
                        .try_init();
                    warn!("JSON logging requires the json-log feature, using full format");
                    result
                }
                LogFormat::Compact => tracing_subscriber::registry()
                    .with(layer!(fmt::layer().compact().with_writer($writer)))
                    .with(filter)
                    .try_init(),
                LogFormat::Full => tracing_subscriber::registry()
                    .with(layer!(fmt::layer().with_writer($writer)))
                    .with(filter)
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(layer!(fmt::layer().pretty().with_writer($writer)))
                    .with(filter)
                    .try_init(),
            }
        };
    }

    match (config.output, &config.file_path) {
        (LogOutput::Stdout, _) => install!(std::io::stdout),
        (LogOutput::Stderr, _) => install!(std::io::stderr),
        (LogOutput::File, Some(path)) => {
            let appender = tracing_appender::rolling::never(
                path.parent().unwrap_or_else(|| Path::new(".")),
                path.file_name().unwrap_or_else(|| OsStr::new("pewter.log")),
            );
            install!(appender)
        }
        (LogOutput::File, None) => {
            let result = install!(std::io::stdout);
            warn!("File output requested without a file path, logging to stdout");
            result
        }
    }
}

/// Filter directives for the per-module levels, sorted by module.
pub fn directives(config: &LoggingConfig) -> Vec<String> {
    let mut directives: Vec<_> = config
        .filters
        .iter()
        .map(|(module, level)| format!("{module}={level}"))
        .collect();
    directives.sort();
    directives
}

/// `RUST_LOG` when set, otherwise the configured level, plus module filters.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    for directive in directives(config) {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring invalid log directive '{directive}': {e}"),
        }
    }

    filter
}

fn fmt_span(events: &SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |span, (_, flag)| span | flag)
}
