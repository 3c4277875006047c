//! Entry rendering for feedrelay.
//!
//! Converts feed entries into ordered content segments and assembles them
//! into chat messages or forwarded-message bundles.

pub mod html;
pub mod provenance;
pub mod renderer;
pub mod segment;

pub use renderer::{EntryRenderer, TOO_LONG};
pub use segment::{Contact, ContentSegment, Delivery, ForwardBundle, InlineImage, RenderedMessage};
