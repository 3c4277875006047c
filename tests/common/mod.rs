//! Shared test collaborators: counting mock fetch and upload ports.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use url::Url;

use feedrelay::config::CacheConfig;
use feedrelay::{
    Contact, EntryRenderer, FetchedMedia, ImageUploader, InlineImage, MediaCache, MediaFetch,
    RelayError, Result,
};

/// Mock media fetcher serving canned bodies per URL, counting invocations.
#[derive(Default)]
pub struct MockFetch {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, bytes: &[u8]) -> Self {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaFetch for MockFetch {
    async fn fetch(&self, url: &Url) -> Result<FetchedMedia> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bodies = self.bodies.lock().unwrap();
        let bytes = bodies
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| RelayError::Fetch(format!("no route for {url}")))?;
        Ok(FetchedMedia {
            final_url: url.clone(),
            disposition_filename: None,
            etag: None,
            content_subtype: None,
            bytes,
        })
    }
}

/// Mock uploader returning the file path as the image ID, counting
/// invocations.
#[derive(Default)]
pub struct MockUploader {
    calls: AtomicUsize,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageUploader for MockUploader {
    async fn upload(&self, file: &Path, _contact: &Contact) -> Result<InlineImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(InlineImage::new(file.to_string_lossy().into_owned()))
    }
}

/// Everything an end-to-end rendering test needs: the renderer, its cache,
/// and handles to the counting mocks.
pub struct TestHarness {
    pub renderer: EntryRenderer<Arc<MockFetch>, Arc<MockUploader>>,
    pub cache: MediaCache,
    pub fetch: Arc<MockFetch>,
    pub uploader: Arc<MockUploader>,
    _dir: TempDir,
}

/// Build a renderer over a temp-dir cache and the mock collaborators.
pub fn test_renderer(fetch: MockFetch) -> TestHarness {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig {
        image_dir: dir.path().join("image").to_string_lossy().into_owned(),
        torrent_dir: dir.path().join("torrent").to_string_lossy().into_owned(),
    };
    let cache = MediaCache::new(&config).unwrap();
    let fetch = Arc::new(fetch);
    let uploader = Arc::new(MockUploader::new());
    let renderer = EntryRenderer::new(cache.clone(), Arc::clone(&fetch), Arc::clone(&uploader));
    TestHarness {
        renderer,
        cache,
        fetch,
        uploader,
        _dir: dir,
    }
}

pub fn contact() -> Contact {
    Contact::new(10, 99)
}
