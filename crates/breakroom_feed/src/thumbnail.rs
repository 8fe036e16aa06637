use std::sync::Arc;

use feed_logging::{feed_warn, tags};

use crate::decode::{DecodeError, ImageDecoder};
use crate::fetch::{build_request_url, Fetcher};
use crate::{FetchError, Thumbnail};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThumbnailError {
    #[error("no thumbnail url")]
    NoUrl,
    #[error("thumbnail fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("thumbnail decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Downloads and decodes article thumbnails, one URL at a time.
#[derive(Clone)]
pub struct ThumbnailResolver {
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn ImageDecoder>,
}

impl ThumbnailResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { fetcher, decoder }
    }

    pub async fn try_resolve(&self, thumbnail_url: &str) -> Result<Thumbnail, ThumbnailError> {
        if thumbnail_url.trim().is_empty() {
            return Err(ThumbnailError::NoUrl);
        }
        let url = build_request_url(thumbnail_url)?;
        let bytes = self.fetcher.fetch(&url).await?;
        let decoded = self.decoder.decode(&bytes)?;
        Ok(Thumbnail {
            source_url: thumbnail_url.to_string(),
            width: decoded.width,
            height: decoded.height,
            rgba: decoded.rgba,
        })
    }

    /// Like [`try_resolve`](Self::try_resolve), but every failure is logged and
    /// becomes `None`.
    pub async fn resolve(&self, thumbnail_url: &str) -> Option<Thumbnail> {
        match self.try_resolve(thumbnail_url).await {
            Ok(thumbnail) => Some(thumbnail),
            Err(ThumbnailError::NoUrl) => None,
            Err(err) => {
                feed_warn!(tag: tags::THUMBNAIL, "{} ({})", err, thumbnail_url);
                None
            }
        }
    }
}
