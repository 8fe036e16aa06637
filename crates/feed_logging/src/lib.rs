#![deny(missing_docs)]
//! Shared logging utilities for the breakroom workspace.
//!
//! This crate provides the `feed_*` logging macros used across the codebase,
//! the stable log targets ("tags") that classify pipeline failures, the
//! global logger setup for binaries, and a minimal test initializer.

use std::fs::File;
use std::io;
use std::path::PathBuf;

#[doc(hidden)]
pub use log;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Stable log targets for the failure classes of the feed pipeline.
///
/// Pass one of these as `tag:` to any `feed_*` macro so that log filters can
/// select a single failure class.
pub mod tags {
    /// The request URL could not be parsed.
    pub const MALFORMED_URL: &str = "breakroom::malformed_url";
    /// The server answered with a status other than 200.
    pub const HTTP_STATUS: &str = "breakroom::http_status";
    /// Transport failures: connect, timeouts, aborted bodies.
    pub const IO: &str = "breakroom::io";
    /// The feed body did not have the expected JSON shape.
    pub const JSON: &str = "breakroom::json";
    /// A thumbnail could not be fetched or decoded.
    pub const THUMBNAIL: &str = "breakroom::thumbnail";

    /// All tags, in declaration order.
    pub const ALL: [&str; 5] = [MALFORMED_URL, HTTP_STATUS, IO, JSON, THUMBNAIL];

    /// Looks a tag up by its short name, e.g. `"thumbnail"`.
    pub fn by_name(name: &str) -> Option<&'static str> {
        ALL.iter()
            .copied()
            .find(|tag| tag.strip_prefix("breakroom::") == Some(name))
    }
}

/// Where [`initialize`] sends log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Standard error, colored when attached to a terminal.
    Terminal,
    /// A file, truncated on startup.
    File(PathBuf),
    /// The terminal and a file.
    Both(PathBuf),
}

/// Global logger setup for a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Output destination.
    pub sink: LogSink,
    /// Most verbose level that is emitted.
    pub level: LevelFilter,
    /// Tags whose records are dropped, e.g. [`tags::THUMBNAIL`] on a flaky image host.
    pub muted: Vec<&'static str>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            sink: LogSink::Terminal,
            level: LevelFilter::Info,
            muted: Vec::new(),
        }
    }
}

/// Installs the global logger.
///
/// Fails only when the log file cannot be created; nothing is installed in
/// that case, so the caller can retry with [`LogSink::Terminal`]. A logger
/// that is already installed is left in place.
pub fn initialize(options: &LogOptions) -> io::Result<()> {
    let config = build_config(&options.muted);
    let level = options.level;
    let terminal = || -> Box<dyn SharedLogger> {
        TermLogger::new(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto)
    };

    let loggers: Vec<Box<dyn SharedLogger>> = match &options.sink {
        LogSink::Terminal => vec![terminal()],
        LogSink::File(path) => vec![WriteLogger::new(level, config.clone(), File::create(path)?)],
        LogSink::Both(path) => {
            let file = File::create(path)?;
            vec![terminal(), WriteLogger::new(level, config.clone(), file)]
        }
    };

    let _ = CombinedLogger::init(loggers);
    Ok(())
}

// Targets carry the tag, so they are printed at every level.
fn build_config(muted: &[&'static str]) -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Trace);
    for tag in muted {
        builder.add_filter_ignore_str(tag);
    }
    builder.build()
}

/// Logs a trace-level message, optionally under a `tag:` target.
#[macro_export]
macro_rules! feed_trace {
    (tag: $tag:expr, $($arg:tt)+) => {{
        $crate::log::trace!(target: $tag, $($arg)+);
    }};
    ($($arg:tt)+) => {{
        $crate::log::trace!($($arg)+);
    }};
}

/// Logs a debug-level message, optionally under a `tag:` target.
#[macro_export]
macro_rules! feed_debug {
    (tag: $tag:expr, $($arg:tt)+) => {{
        $crate::log::debug!(target: $tag, $($arg)+);
    }};
    ($($arg:tt)+) => {{
        $crate::log::debug!($($arg)+);
    }};
}

/// Logs an info-level message, optionally under a `tag:` target.
#[macro_export]
macro_rules! feed_info {
    (tag: $tag:expr, $($arg:tt)+) => {{
        $crate::log::info!(target: $tag, $($arg)+);
    }};
    ($($arg:tt)+) => {{
        $crate::log::info!($($arg)+);
    }};
}

/// Logs a warn-level message, optionally under a `tag:` target.
#[macro_export]
macro_rules! feed_warn {
    (tag: $tag:expr, $($arg:tt)+) => {{
        $crate::log::warn!(target: $tag, $($arg)+);
    }};
    ($($arg:tt)+) => {{
        $crate::log::warn!($($arg)+);
    }};
}

/// Logs an error-level message, optionally under a `tag:` target.
#[macro_export]
macro_rules! feed_error {
    (tag: $tag:expr, $($arg:tt)+) => {{
        $crate::log::error!(target: $tag, $($arg)+);
    }};
    ($($arg:tt)+) => {{
        $crate::log::error!($($arg)+);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};
    use tempfile::TempDir;

    #[test]
    fn tags_are_unique_and_namespaced() {
        for (i, tag) in tags::ALL.iter().enumerate() {
            assert!(tag.starts_with("breakroom::"), "{tag}");
            assert!(!tags::ALL[i + 1..].contains(tag), "duplicate tag {tag}");
        }
    }

    #[test]
    fn macros_accept_tagged_and_plain_forms() {
        super::initialize_for_tests();
        let code = 503;
        feed_error!(tag: tags::HTTP_STATUS, "Error response code: {}", code);
        feed_warn!(tag: tags::THUMBNAIL, "thumbnail skipped");
        feed_info!("plain {}", "message");
        feed_debug!("debug {code}");
        feed_trace!(tag: tags::IO, "trace");
    }

    #[test]
    fn short_names_resolve_to_tags() {
        assert_eq!(tags::by_name("thumbnail"), Some(tags::THUMBNAIL));
        assert_eq!(tags::by_name("http_status"), Some(tags::HTTP_STATUS));
        assert_eq!(tags::by_name("breakroom::io"), None);
        assert_eq!(tags::by_name("images"), None);
    }

    #[test]
    fn muted_tags_are_dropped_from_the_output() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("muted.log");
        let logger = WriteLogger::new(
            LevelFilter::Debug,
            build_config(&[tags::THUMBNAIL]),
            File::create(&path).unwrap(),
        );

        for (tag, text) in [(tags::THUMBNAIL, "image gone"), (tags::IO, "socket closed")] {
            logger.log(
                &Record::builder()
                    .target(tag)
                    .level(Level::Warn)
                    .args(format_args!("{text}"))
                    .build(),
            );
        }
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("socket closed"), "{written}");
        assert!(written.contains(tags::IO), "{written}");
        assert!(!written.contains("image gone"), "{written}");
    }

    #[test]
    fn file_sink_creates_the_log_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("breakroom.log");
        let options = LogOptions {
            sink: LogSink::File(path.clone()),
            ..LogOptions::default()
        };
        initialize(&options).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let options = LogOptions {
            sink: LogSink::Both(temp.path().join("missing").join("breakroom.log")),
            ..LogOptions::default()
        };
        assert!(initialize(&options).is_err());
    }
}
