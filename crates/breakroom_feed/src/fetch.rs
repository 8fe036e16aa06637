use std::time::Duration;

use futures_util::StreamExt;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Longest silence tolerated between reads, including the wait for response headers.
    pub read_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl FetchSettings {
    pub fn for_thumbnails() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            ..Self::default()
        }
    }
}

/// Validate a request URL. Only absolute `http`/`https` URLs are fetchable.
pub fn build_request_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::new(FailureKind::InvalidUrl, "empty url"));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {other}"),
        )),
    }
}

/// Callers validate with [`build_request_url`] first, so implementations only
/// ever see absolute `http`/`https` URLs.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Single-attempt GET over reqwest. Every call builds and owns its client, so
/// no connection outlives the call.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .redirect(Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(map_reqwest_error)
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let client = self.build_client()?;
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

// Request URLs can carry an API key in the query, so it never reaches the message.
fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = classify_failure(err.is_timeout(), err.is_connect(), err.is_redirect());
    FetchError::new(kind, err.without_url().to_string())
}

fn classify_failure(timeout: bool, connect: bool, redirect: bool) -> FailureKind {
    match (timeout, connect, redirect) {
        (true, true, _) => FailureKind::ConnectTimeout,
        (true, false, _) => FailureKind::ReadTimeout,
        (false, _, true) => FailureKind::RedirectLimitExceeded,
        _ => FailureKind::Network,
    }
}
