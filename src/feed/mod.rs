//! Feed types and fetching for feedrelay.

pub mod fetcher;
pub mod types;

pub use fetcher::{parse_feed, validate_url, FeedFetcher, FetchedFeed};
pub use types::{Enclosure, FeedEntry};
