mod platform;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use breakroom_feed::{ArticleFeedService, FeedSettings, MissingFieldPolicy};
use clap::Parser;

use platform::logging::LogDestination;

/// Fetch one page of a news feed and list its articles.
#[derive(Debug, Parser)]
#[command(name = "breakroom", version)]
struct Cli {
    /// Fully formed request URL, e.g. a content API search query.
    url: String,
    /// RON settings file with timeouts and thumbnail options.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = platform::logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    /// Drop records logged under a tag (malformed_url, http_status, io, json, thumbnail).
    #[arg(long = "mute", value_name = "TAG", value_parser = platform::logging::parse_tag)]
    muted: Vec<&'static str>,
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
    /// Resolve thumbnails one at a time.
    #[arg(long)]
    sequential: bool,
    /// Stop at the first result entry that lacks a required field.
    #[arg(long)]
    truncate_on_missing: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(platform::logging::log_options(
        cli.log,
        cli.log_file.clone(),
        cli.verbose,
        cli.muted.clone(),
    ));

    let mut settings = match &cli.config {
        Some(path) => platform::config::load_settings(path),
        None => FeedSettings::default(),
    };
    if cli.sequential {
        settings.thumbnail_concurrency = 1;
    }
    if cli.truncate_on_missing {
        settings.missing_field_policy = MissingFieldPolicy::Truncate;
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let service = ArticleFeedService::new(settings);
    let report = runtime.block_on(service.fetch_feed(&cli.url));

    let mut stdout = std::io::stdout().lock();
    platform::render::write_report(&mut stdout, &report).context("failed to write report")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "breakroom",
            "https://content.guardianapis.com/search?q=coffee",
            "--log",
            "both",
            "--sequential",
            "--truncate-on-missing",
            "--mute",
            "thumbnail",
            "--mute",
            "io",
        ])
        .unwrap();
        assert_eq!(cli.log, LogDestination::Both);
        assert_eq!(cli.log_file, PathBuf::from("breakroom.log"));
        assert_eq!(cli.muted, vec![feed_logging::tags::THUMBNAIL, feed_logging::tags::IO]);
        assert!(cli.sequential && cli.truncate_on_missing);
        assert!(cli.config.is_none());
    }

    #[test]
    fn unknown_mute_tag_is_rejected() {
        let parsed = Cli::try_parse_from(["breakroom", "http://x/search", "--mute", "images"]);
        assert!(parsed.is_err());
    }
}
