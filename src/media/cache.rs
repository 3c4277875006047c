//! Write-once media cache.
//!
//! Cached files are keyed by filename (the URL's final path segment, or the
//! server-asserted name). Once a file exists it is reused without refetch:
//! no staleness check, no eviction, no integrity check. Filename collisions
//! silently reuse whatever was stored first.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::CacheConfig;
use crate::Result;

/// On-disk cache for inline images and torrent files.
#[derive(Debug, Clone)]
pub struct MediaCache {
    image_dir: PathBuf,
    torrent_dir: PathBuf,
}

impl MediaCache {
    /// Create a cache rooted at the configured directories, creating them if
    /// needed.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let image_dir = PathBuf::from(&config.image_dir);
        let torrent_dir = PathBuf::from(&config.torrent_dir);
        std::fs::create_dir_all(&image_dir)?;
        std::fs::create_dir_all(&torrent_dir)?;

        Ok(Self {
            image_dir,
            torrent_dir,
        })
    }

    /// Path an image with the given stored name resolves to.
    pub fn image_path(&self, stored_name: &str) -> PathBuf {
        self.image_dir.join(sanitize_filename(stored_name))
    }

    /// Path a torrent file with the given stored name resolves to.
    pub fn torrent_path(&self, stored_name: &str) -> PathBuf {
        self.torrent_dir.join(sanitize_filename(stored_name))
    }

    /// Store bytes at the given cache path unless a file is already there.
    ///
    /// Writes go to a temporary sibling first and are published with an
    /// atomic rename, so concurrent writers of the same key settle on the
    /// last writer's bytes rather than interleaving.
    pub async fn store(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if path.is_file() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".part");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }
}

/// Derive a cache key from a URL: the percent-decoded final path segment.
pub fn filename_from_url(url: &Url) -> String {
    let segment = url.path().rsplit('/').next().unwrap_or_default();
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Reduce a server-asserted filename to its final path component.
fn sanitize_filename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or_default()
}
