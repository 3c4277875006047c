//! feedrelay - relay RSS/Atom feed entries as chat messages.
//!
//! Converts feed entries (HTML or plain text) into a constrained chat
//! message representation: text, inline images resolved through a write-once
//! disk cache, and forwarded-message bundles. The host environment owns feed
//! scheduling, subscription persistence and delivery.

pub mod config;
pub mod datetime;
pub mod error;
pub mod feed;
pub mod logging;
pub mod media;
pub mod render;

pub use config::Config;
pub use error::{RelayError, Result};
pub use feed::{Enclosure, FeedEntry, FeedFetcher, FetchedFeed};
pub use media::{
    fetch_torrent, resolve_image, FetchedMedia, HttpMediaFetch, ImageUploader, MediaCache,
    MediaFetch,
};
pub use render::{
    Contact, ContentSegment, Delivery, EntryRenderer, ForwardBundle, InlineImage, RenderedMessage,
};
