//! Breakroom feed: fetch a news API page, parse it into articles, resolve thumbnails.
mod decode;
mod fetch;
mod parse;
mod service;
mod thumbnail;
mod types;

pub use decode::{decode_body_text, DecodeError, DecodedImage, ImageCrateDecoder, ImageDecoder};
pub use fetch::{build_request_url, FetchSettings, Fetcher, ReqwestFetcher};
pub use parse::{ArticleParser, MissingFieldPolicy, ParseIssue, ParseIssueKind, ParsedFeed};
pub use service::{ArticleFeedService, FeedReport, FeedSettings, DEFAULT_THUMBNAIL_CONCURRENCY};
pub use thumbnail::{ThumbnailError, ThumbnailResolver};
pub use types::{Article, FailureKind, FetchError, ParsedArticle, Thumbnail};
