//! Inline image resolution.
//!
//! Resolves an `img` source URL to a platform-native inline image: cache
//! lookup, fetch on miss, store under the server-asserted or URL-derived
//! filename, then upload. Failures surface as errors; the renderer degrades
//! them to placeholder text.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::HttpConfig;
use crate::media::cache::{filename_from_url, MediaCache};
use crate::render::{Contact, InlineImage};
use crate::{RelayError, Result};

/// Bytes fetched from a remote URL plus the response metadata the cache
/// naming rules need.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    /// The response's resolved URL, which may differ from the request URL
    /// after redirects.
    pub final_url: Url,
    /// Filename parameter of the response's content-disposition header.
    pub disposition_filename: Option<String>,
    /// Entity-tag value, without surrounding quotes.
    pub etag: Option<String>,
    /// Content subtype of the response body (e.g. `png` for `image/png`).
    pub content_subtype: Option<String>,
    /// Response body.
    pub bytes: Vec<u8>,
}

/// Port for fetching remote media bytes.
#[async_trait]
pub trait MediaFetch: Send + Sync {
    /// Fetch the URL, following redirects, and return the body with naming
    /// metadata.
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia>;
}

/// Port for uploading a local file as a platform-native inline image.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload the file to the platform, bound to the contact.
    async fn upload(&self, file: &Path, contact: &Contact) -> Result<InlineImage>;
}

#[async_trait]
impl<F: MediaFetch> MediaFetch for std::sync::Arc<F> {
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<U: ImageUploader> ImageUploader for std::sync::Arc<U> {
    async fn upload(&self, file: &Path, contact: &Contact) -> Result<InlineImage> {
        (**self).upload(file, contact).await
    }
}

/// HTTP-backed [`MediaFetch`] implementation.
pub struct HttpMediaFetch {
    client: Client,
}

impl HttpMediaFetch {
    /// Create a fetcher from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RelayError::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetch for HttpMediaFetch {
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RelayError::Fetch(format!("failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(RelayError::Fetch(format!(
                "HTTP error for {url}: {}",
                response.status()
            )));
        }

        let final_url = response.url().clone();
        let disposition_filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);
        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());
        let content_subtype = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_subtype);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Fetch(format!("failed to read {url}: {e}")))?
            .to_vec();

        Ok(FetchedMedia {
            final_url,
            disposition_filename,
            etag,
            content_subtype,
            bytes,
        })
    }
}

/// Extract the filename parameter from a content-disposition header value.
fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (key, val) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let val = val.trim().trim_matches('"');
        if val.is_empty() {
            None
        } else {
            Some(val.to_string())
        }
    })
}

/// Extract the subtype from a content-type header value.
fn content_subtype(value: &str) -> Option<String> {
    let essence = value.split(';').next()?.trim();
    let subtype = essence.split('/').nth(1)?.trim();
    if subtype.is_empty() {
        None
    } else {
        Some(subtype.to_string())
    }
}

/// Resolve an image URL to an uploaded inline image.
///
/// Cache hits (by the URL's percent-decoded final path segment) reuse the
/// file without any network access. On a miss the stored filename is chosen
/// by priority: content-disposition filename, entity-tag plus content
/// subtype, the response's resolved-URL final segment.
pub async fn resolve_image<F, U>(
    src: &str,
    contact: &Contact,
    cache: &MediaCache,
    fetch: &F,
    uploader: &U,
) -> Result<InlineImage>
where
    F: MediaFetch,
    U: ImageUploader,
{
    let url = Url::parse(src).map_err(|e| RelayError::Fetch(format!("invalid image URL: {e}")))?;

    let keyed = cache.image_path(&filename_from_url(&url));
    let file = if keyed.is_file() {
        keyed
    } else {
        let media = fetch.fetch(&url).await?;

        let stored_name = media
            .disposition_filename
            .clone()
            .or_else(|| {
                media.etag.as_ref().map(|etag| {
                    format!("{etag}.{}", media.content_subtype.as_deref().unwrap_or("bin"))
                })
            })
            .unwrap_or_else(|| filename_from_url(&media.final_url));

        let path = cache.image_path(&stored_name);
        cache.store(&path, &media.bytes).await?;
        path
    };

    uploader.upload(&file, contact).await
}
