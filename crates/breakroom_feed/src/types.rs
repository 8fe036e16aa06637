use std::fmt;

/// One published piece of content, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// ISO-8601 timestamp exactly as the source supplied it.
    pub publication_date: String,
    pub title: String,
    pub url: String,
    pub trail_text: String,
    pub byline: String,
    pub thumbnail: Option<Thumbnail>,
}

impl Article {
    pub fn from_parsed(parsed: ParsedArticle, thumbnail: Option<Thumbnail>) -> Self {
        Self {
            publication_date: parsed.publication_date,
            title: parsed.title,
            url: parsed.url,
            trail_text: parsed.trail_text,
            byline: parsed.byline,
            thumbnail,
        }
    }
}

/// A result entry that carried every required field, before thumbnail resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    pub publication_date: String,
    pub title: String,
    pub url: String,
    pub trail_text: String,
    pub byline: String,
    /// Empty when the entry had no thumbnail.
    pub thumbnail_url: String,
}

/// Decoded thumbnail as 8-bit RGBA pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub source_url: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

// Pixel buffers are large; keep Debug output readable.
impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("source_url", &self.source_url)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    ConnectTimeout,
    ReadTimeout,
    HttpStatus(u16),
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl FailureKind {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FailureKind::ConnectTimeout | FailureKind::ReadTimeout)
    }

    /// Log target under which failures of this kind are reported.
    pub fn log_tag(&self) -> &'static str {
        use feed_logging::tags;
        match self {
            FailureKind::InvalidUrl => tags::MALFORMED_URL,
            FailureKind::HttpStatus(_) => tags::HTTP_STATUS,
            FailureKind::ConnectTimeout
            | FailureKind::ReadTimeout
            | FailureKind::RedirectLimitExceeded
            | FailureKind::TooLarge { .. }
            | FailureKind::Network => tags::IO,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::ConnectTimeout => write!(f, "connect timeout"),
            FailureKind::ReadTimeout => write!(f, "read timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
