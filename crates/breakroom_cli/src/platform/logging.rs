//! Maps the logging flags onto `feed_logging::LogOptions`.

use std::path::PathBuf;

use feed_logging::{tags, LogOptions, LogSink};
use log::LevelFilter;

pub(crate) const DEFAULT_LOG_FILE: &str = "breakroom.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogDestination {
    File,
    Terminal,
    Both,
}

/// `--mute` value parser: a tag's short name, such as `thumbnail`.
pub(crate) fn parse_tag(name: &str) -> Result<&'static str, String> {
    tags::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = tags::ALL
            .iter()
            .filter_map(|tag| tag.strip_prefix("breakroom::"))
            .collect();
        format!("unknown log tag `{name}` (expected one of: {})", known.join(", "))
    })
}

pub(crate) fn log_options(
    destination: LogDestination,
    file: PathBuf,
    verbose: bool,
    muted: Vec<&'static str>,
) -> LogOptions {
    let sink = match destination {
        LogDestination::Terminal => LogSink::Terminal,
        LogDestination::File => LogSink::File(file),
        LogDestination::Both => LogSink::Both(file),
    };
    LogOptions {
        sink,
        level: if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        muted,
    }
}

/// Installs the logger, dropping back to the terminal when the file cannot be created.
pub(crate) fn initialize(options: LogOptions) {
    if let Err(err) = feed_logging::initialize(&options) {
        eprintln!("Warning: could not open log file ({err}); logging to terminal");
        let _ = feed_logging::initialize(&LogOptions {
            sink: LogSink::Terminal,
            ..options
        });
    }
}
