//! Feed entry types for feedrelay.

use chrono::{DateTime, Utc};

/// A feed-declared attachment (enclosure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    /// Attachment URL.
    pub url: String,
    /// MIME type, when the feed declares one.
    pub mime_type: Option<String>,
}

impl Enclosure {
    /// Create a new enclosure.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: None,
        }
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Whether this enclosure is an inline image rather than an attachment.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }

    /// Whether this enclosure looks like a downloadable torrent file.
    pub fn is_torrent(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m == "application/x-bittorrent")
            || self.url.ends_with(".torrent")
    }
}

/// One item from an RSS/Atom feed, as supplied to the renderer.
///
/// Read-only input: the renderer never mutates it.
#[derive(Debug, Clone, Default)]
pub struct FeedEntry {
    /// Entry title.
    pub title: String,
    /// Structured HTML body, when the feed supplies one.
    pub html: Option<String>,
    /// Plain-text body, used when no HTML body is present.
    pub text: Option<String>,
    /// Link to the original article.
    pub link: Option<String>,
    /// When the entry was published.
    pub published_at: Option<DateTime<Utc>>,
    /// When the entry was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Author name.
    pub author: Option<String>,
    /// Category names, in feed order.
    pub categories: Vec<String>,
    /// Enclosures, in feed order.
    pub enclosures: Vec<Enclosure>,
}

impl FeedEntry {
    /// Create a new entry with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the plain-text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the published date.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Set the updated date.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Add an enclosure.
    pub fn with_enclosure(mut self, enclosure: Enclosure) -> Self {
        self.enclosures.push(enclosure);
        self
    }

    /// The entry's most recent timestamp: updated date falling back to
    /// published date.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.published_at)
    }

    /// The first enclosure that is not an inline image, if any.
    pub fn attachment(&self) -> Option<&Enclosure> {
        self.enclosures.iter().find(|e| !e.is_image())
    }

    /// The first enclosure that looks like a torrent file, if any.
    pub fn torrent(&self) -> Option<&Enclosure> {
        self.enclosures.iter().find(|e| e.is_torrent())
    }
}
