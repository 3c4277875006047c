//! Entry rendering.
//!
//! Converts one feed entry into a chat message or a forwarded-message
//! bundle. Rendering never fails: every per-node failure is logged and
//! degraded to a placeholder segment.

use chrono::Utc;
use scraper::Html;
use tracing::warn;

use crate::datetime;
use crate::feed::FeedEntry;
use crate::media::image::{resolve_image, ImageUploader, MediaFetch};
use crate::media::MediaCache;
use crate::render::html::{self, BodyToken};
use crate::render::provenance;
use crate::render::segment::{Contact, Delivery, ForwardBundle, RenderedMessage};

/// Separator line between body and footer.
const FOOTER_SEPARATOR: &str = "------";

/// Marker emitted when an entry has no source link.
const NO_SOURCE: &str = "none";

/// Fixed message substituted when the rendered content exceeds the length
/// limit.
pub const TOO_LONG: &str = "content too long";

/// Renders feed entries into deliverable messages.
pub struct EntryRenderer<F, U> {
    cache: MediaCache,
    fetch: F,
    uploader: U,
}

impl<F, U> EntryRenderer<F, U>
where
    F: MediaFetch,
    U: ImageUploader,
{
    /// Create a renderer over the given cache and collaborators.
    pub fn new(cache: MediaCache, fetch: F, uploader: U) -> Self {
        Self {
            cache,
            fetch,
            uploader,
        }
    }

    /// Render one entry for delivery to `contact`.
    ///
    /// `limit` caps the inline message's character length; `forward` selects
    /// forwarded-bundle output, which is never length-limited.
    pub async fn render(
        &self,
        entry: &FeedEntry,
        contact: &Contact,
        limit: usize,
        forward: bool,
    ) -> Delivery {
        let (source, tokens) = self.body_tokens(entry);

        let mut message = RenderedMessage::new();
        for token in tokens {
            match token {
                BodyToken::Text(text) => message.push_text(text),
                BodyToken::LineBreak => message.push_line_break(),
                BodyToken::Image(src) => {
                    match resolve_image(&src, contact, &self.cache, &self.fetch, &self.uploader)
                        .await
                    {
                        Ok(image) => message.push_image(image),
                        Err(e) => {
                            warn!(url = %src, error = %e, "image resolution failed");
                            message.push_text(format!("[{src}]"));
                        }
                    }
                }
            }
        }

        self.append_footer(&mut message, entry, source.as_deref());

        if forward {
            Delivery::Forward(self.bundle(entry, contact, message))
        } else if message.text_len() <= limit {
            Delivery::Inline(message)
        } else {
            let mut placeholder = RenderedMessage::new();
            placeholder.push_text(TOO_LONG);
            Delivery::Inline(placeholder)
        }
    }

    /// Extract provenance and produce body tokens for the entry.
    fn body_tokens(&self, entry: &FeedEntry) -> (Option<String>, Vec<BodyToken>) {
        match &entry.html {
            Some(body) => {
                let mut doc = Html::parse_fragment(body);
                let source = provenance::extract_and_strip(&mut doc);
                (source, html::walk(&doc))
            }
            None => {
                let body = entry.text.as_deref().unwrap_or_default();
                let source = provenance::extract_from_text(body);
                let cleaned = html::plain_text_body(body);
                let tokens = if cleaned.is_empty() {
                    Vec::new()
                } else {
                    vec![BodyToken::Text(cleaned)]
                };
                (source, tokens)
            }
        }
    }

    /// Append the footer: separator, source link, publish time, provenance
    /// and attachment lines.
    fn append_footer(&self, message: &mut RenderedMessage, entry: &FeedEntry, source: Option<&str>) {
        message.push_line_break();
        message.push_text(FOOTER_SEPARATOR);
        message.push_line_break();

        let link = entry.link.as_deref().unwrap_or(NO_SOURCE);
        message.push_text(format!("Source: {link}"));
        message.push_line_break();
        message.push_text(format!(
            "Published: {}",
            datetime::format_optional(entry.published_at.as_ref())
        ));

        if let Some(source) = source {
            message.push_line_break();
            message.push_text(format!("Forwarded from {source}"));
        }

        if let Some(attachment) = entry.attachment() {
            if !attachment.url.is_empty() {
                message.push_line_break();
                message.push_text(format!("Attachment: {}", attachment.url));
            }
        }
    }

    /// Wrap the message as a forward bundle attributed to the contact's bot
    /// identity at the entry's publish time.
    fn bundle(&self, entry: &FeedEntry, contact: &Contact, message: RenderedMessage) -> ForwardBundle {
        let timestamp = entry
            .published_at
            .or(entry.updated_at)
            .unwrap_or_else(Utc::now);

        ForwardBundle {
            sender_id: contact.bot_id,
            timestamp_secs: timestamp.timestamp(),
            message,
            preview: vec![
                entry.title.clone(),
                entry.author.clone().unwrap_or_default(),
                datetime::format_optional(entry.last_updated().as_ref()),
                entry.categories.join(", "),
            ],
        }
    }
}
