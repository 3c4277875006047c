//! Media handling for feedrelay: the on-disk cache, image resolution and
//! torrent retrieval.

pub mod cache;
pub mod image;
pub mod torrent;

pub use cache::{filename_from_url, MediaCache};
pub use image::{resolve_image, FetchedMedia, HttpMediaFetch, ImageUploader, MediaFetch};
pub use torrent::{fetch_torrent, fullwidth};
