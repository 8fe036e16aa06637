use std::sync::Arc;

use feed_logging::{feed_error, feed_info, tags};
use futures_util::stream::{self, StreamExt};
use url::Url;

use crate::decode::{decode_body_text, ImageCrateDecoder};
use crate::fetch::{build_request_url, FetchSettings, Fetcher, ReqwestFetcher};
use crate::parse::{ArticleParser, MissingFieldPolicy, ParseIssue};
use crate::thumbnail::ThumbnailResolver;
use crate::{Article, FailureKind, FetchError, ParsedArticle};

pub const DEFAULT_THUMBNAIL_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    pub feed: FetchSettings,
    pub thumbnails: FetchSettings,
    /// Thumbnails fetched at once. `1` resolves them strictly one after another.
    pub thumbnail_concurrency: usize,
    pub missing_field_policy: MissingFieldPolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            feed: FetchSettings::default(),
            thumbnails: FetchSettings::for_thumbnails(),
            thumbnail_concurrency: DEFAULT_THUMBNAIL_CONCURRENCY,
            missing_field_policy: MissingFieldPolicy::default(),
        }
    }
}

/// Everything one pipeline run produced, including the failures it absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedReport {
    pub articles: Vec<Article>,
    pub fetch_error: Option<FetchError>,
    pub parse_issues: Vec<ParseIssue>,
}

/// Fetch → parse → thumbnail pipeline.
///
/// Holds no per-request state; every call owns its connections and buffers.
pub struct ArticleFeedService {
    fetcher: Arc<dyn Fetcher>,
    parser: ArticleParser,
    thumbnails: ThumbnailResolver,
    thumbnail_concurrency: usize,
}

impl ArticleFeedService {
    pub fn new(settings: FeedSettings) -> Self {
        let thumbnails = ThumbnailResolver::new(
            Arc::new(ReqwestFetcher::new(settings.thumbnails)),
            Arc::new(ImageCrateDecoder),
        );
        Self::from_parts(
            Arc::new(ReqwestFetcher::new(settings.feed)),
            ArticleParser::new(settings.missing_field_policy),
            thumbnails,
            settings.thumbnail_concurrency,
        )
    }

    pub fn from_parts(
        fetcher: Arc<dyn Fetcher>,
        parser: ArticleParser,
        thumbnails: ThumbnailResolver,
        thumbnail_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            parser,
            thumbnails,
            thumbnail_concurrency: thumbnail_concurrency.max(1),
        }
    }

    /// Articles from `request_url`, in feed order. Never fails: any problem
    /// yields a shorter (possibly empty) list.
    pub async fn fetch_article_data(&self, request_url: &str) -> Vec<Article> {
        self.fetch_feed(request_url).await.articles
    }

    pub async fn fetch_feed(&self, request_url: &str) -> FeedReport {
        let url = match build_request_url(request_url) {
            Ok(url) => url,
            Err(err) => {
                feed_error!(tag: tags::MALFORMED_URL, "Malformed request URL: {}", err);
                return FeedReport {
                    fetch_error: Some(err),
                    ..FeedReport::default()
                };
            }
        };

        let (body, fetch_error) = match self.fetch_body(&url).await {
            Ok(body) => (body, None),
            Err(err) => (String::new(), Some(err)),
        };

        let parsed = self.parser.parse(&body);
        let articles = self.resolve_thumbnails(parsed.articles).await;
        feed_info!(
            "Fetched {} article(s) from {} ({} parse issue(s))",
            articles.len(),
            loggable_target(&url),
            parsed.issues.len()
        );

        FeedReport {
            articles,
            fetch_error,
            parse_issues: parsed.issues,
        }
    }

    async fn fetch_body(&self, url: &Url) -> Result<String, FetchError> {
        match self.fetcher.fetch(url).await {
            Ok(bytes) => Ok(decode_body_text(&bytes)),
            Err(err) => {
                match err.kind {
                    FailureKind::HttpStatus(code) => {
                        feed_error!(tag: tags::HTTP_STATUS, "Error response code: {}", code);
                    }
                    _ => {
                        feed_error!(
                            tag: err.kind.log_tag(),
                            "Problem retrieving the article JSON results: {}",
                            err
                        );
                    }
                }
                Err(err)
            }
        }
    }

    async fn resolve_thumbnails(&self, parsed: Vec<ParsedArticle>) -> Vec<Article> {
        // `buffered` yields in input order regardless of completion order.
        stream::iter(parsed)
            .map(|article| async move {
                let thumbnail = self.thumbnails.resolve(&article.thumbnail_url).await;
                Article::from_parsed(article, thumbnail)
            })
            .buffered(self.thumbnail_concurrency)
            .collect()
            .await
    }
}

/// Host and path only; the query string carries the API key.
fn loggable_target(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}
