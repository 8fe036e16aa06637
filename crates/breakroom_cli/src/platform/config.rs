//! RON settings file for the CLI.
//!
//! Every field is optional; anything left out keeps the library default.
//! Example:
//!
//! ```ron
//! (
//!     feed: (connect_timeout_ms: 15000, read_timeout_ms: 10000),
//!     thumbnails: (max_bytes: 2097152),
//!     thumbnail_concurrency: 8,
//!     missing_field_policy: Truncate,
//! )
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use breakroom_feed::{FeedSettings, FetchSettings, MissingFieldPolicy};
use feed_logging::{feed_info, feed_warn};
use ron::extensions::Extensions;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FetchOverrides {
    connect_timeout_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    redirect_limit: Option<usize>,
    max_bytes: Option<u64>,
}

impl FetchOverrides {
    fn apply(self, base: FetchSettings) -> FetchSettings {
        FetchSettings {
            connect_timeout: self
                .connect_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(base.connect_timeout),
            read_timeout: self
                .read_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(base.read_timeout),
            redirect_limit: self.redirect_limit.unwrap_or(base.redirect_limit),
            max_bytes: self.max_bytes.unwrap_or(base.max_bytes),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    feed: FetchOverrides,
    thumbnails: FetchOverrides,
    thumbnail_concurrency: Option<usize>,
    missing_field_policy: Option<MissingFieldPolicy>,
}

pub(crate) fn parse_settings(text: &str) -> Result<FeedSettings, ron::error::SpannedError> {
    let file: SettingsFile = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(text)?;

    let defaults = FeedSettings::default();
    Ok(FeedSettings {
        feed: file.feed.apply(defaults.feed),
        thumbnails: file.thumbnails.apply(defaults.thumbnails),
        thumbnail_concurrency: file
            .thumbnail_concurrency
            .unwrap_or(defaults.thumbnail_concurrency),
        missing_field_policy: file
            .missing_field_policy
            .unwrap_or(defaults.missing_field_policy),
    })
}

/// Load settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub(crate) fn load_settings(path: &Path) -> FeedSettings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            feed_warn!("Settings file {:?} not found; using defaults", path);
            return FeedSettings::default();
        }
        Err(err) => {
            feed_warn!("Failed to read settings from {:?}: {}", path, err);
            return FeedSettings::default();
        }
    };

    match parse_settings(&content) {
        Ok(settings) => {
            feed_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            feed_warn!("Failed to parse settings from {:?}: {}", path, err);
            FeedSettings::default()
        }
    }
}
