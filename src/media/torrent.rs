//! Enclosure torrent retrieval.
//!
//! Downloads an entry's torrent enclosure into the torrent cache, named
//! after the entry title with Windows-reserved characters mapped to their
//! fullwidth forms. Best-effort: failures are logged and yield `None`.

use std::path::PathBuf;

use tracing::warn;
use url::Url;

use crate::feed::FeedEntry;
use crate::media::cache::MediaCache;
use crate::media::image::MediaFetch;

const FULLWIDTH_CHARS: [(char, char); 9] = [
    ('\\', '＼'),
    ('/', '／'),
    (':', '：'),
    ('*', '＊'),
    ('?', '？'),
    ('"', '＂'),
    ('<', '＜'),
    ('>', '＞'),
    ('|', '｜'),
];

/// Replace filesystem-reserved characters with their fullwidth forms.
pub fn fullwidth(name: &str) -> String {
    name.chars()
        .map(|c| {
            FULLWIDTH_CHARS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Download the entry's torrent enclosure into the cache.
///
/// Returns the cached file path, or `None` when the entry has no
/// http(s)-reachable torrent enclosure or the download fails. An existing
/// cached file is reused without refetch.
pub async fn fetch_torrent<F: MediaFetch>(
    entry: &FeedEntry,
    cache: &MediaCache,
    fetch: &F,
) -> Option<PathBuf> {
    let enclosure = entry.torrent()?;
    if !enclosure.url.starts_with("http") {
        return None;
    }
    let url = match Url::parse(&enclosure.url) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = %enclosure.url, error = %e, "invalid torrent URL");
            return None;
        }
    };

    let path = cache.torrent_path(&format!("{}.torrent", fullwidth(&entry.title)));
    if path.is_file() {
        return Some(path);
    }

    let media = match fetch.fetch(&url).await {
        Ok(media) => media,
        Err(e) => {
            warn!(url = %url, error = %e, "torrent download failed");
            return None;
        }
    };

    match cache.store(&path, &media.bytes).await {
        Ok(()) => Some(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "torrent write failed");
            None
        }
    }
}
