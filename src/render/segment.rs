//! Message segment types for feedrelay.

/// A delivery target, opaque to the renderer.
///
/// Only used as the upload target for inline images and as the attributed
/// sender of forward bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Target conversation/contact ID.
    pub id: i64,
    /// Bot identity on the platform, used as the forward-bundle sender.
    pub bot_id: i64,
}

impl Contact {
    /// Create a new contact.
    pub fn new(id: i64, bot_id: i64) -> Self {
        Self { id, bot_id }
    }
}

/// A platform-native inline image reference, produced by an uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Platform image identifier.
    pub image_id: String,
}

impl InlineImage {
    /// Create a new inline image reference.
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
        }
    }
}

/// One ordered piece of rendered message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    /// Plain text.
    Text(String),
    /// A resolved inline image.
    Image(InlineImage),
    /// An explicit line break.
    LineBreak,
}

impl ContentSegment {
    /// Character length this segment contributes to the message text.
    ///
    /// Line breaks count as one character; images contribute nothing.
    pub fn text_len(&self) -> usize {
        match self {
            ContentSegment::Text(s) => s.chars().count(),
            ContentSegment::LineBreak => 1,
            ContentSegment::Image(_) => 0,
        }
    }
}

/// An ordered message assembled from content segments.
///
/// Constructed per entry, delivered once, discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Segments in rendering order.
    pub segments: Vec<ContentSegment>,
}

impl RenderedMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text segment.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.segments.push(ContentSegment::Text(text.into()));
    }

    /// Append an inline image segment.
    pub fn push_image(&mut self, image: InlineImage) {
        self.segments.push(ContentSegment::Image(image));
    }

    /// Append a line break.
    pub fn push_line_break(&mut self) {
        self.segments.push(ContentSegment::LineBreak);
    }

    /// Total character length of the textual content.
    pub fn text_len(&self) -> usize {
        self.segments.iter().map(ContentSegment::text_len).sum()
    }

    /// Render the textual content, with images shown as a marker.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                ContentSegment::Text(s) => out.push_str(s),
                ContentSegment::LineBreak => out.push('\n'),
                ContentSegment::Image(_) => out.push_str("[image]"),
            }
        }
        out
    }
}

/// A forwarded-message bundle wrapping a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardBundle {
    /// Sender identity the bundle is attributed to.
    pub sender_id: i64,
    /// Attribution timestamp, seconds since the epoch.
    pub timestamp_secs: i64,
    /// The wrapped message.
    pub message: RenderedMessage,
    /// Preview summary lines: title, author, last-updated time, categories.
    pub preview: Vec<String>,
}

/// The outcome of rendering one feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Deliver the message directly.
    Inline(RenderedMessage),
    /// Deliver as a forwarded-message bundle.
    Forward(ForwardBundle),
}

impl Delivery {
    /// The rendered message, regardless of delivery mode.
    pub fn message(&self) -> &RenderedMessage {
        match self {
            Delivery::Inline(message) => message,
            Delivery::Forward(bundle) => &bundle.message,
        }
    }
}
