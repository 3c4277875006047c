//! Forwarded-from provenance extraction.
//!
//! Feed entries reposted from another source carry a "Forwarded From" /
//! "转发自" marker. The marker is captured as the provenance source and the
//! enclosing block is removed before the body walk.

use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

static FORWARD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Forwarded From|转发自)").expect("forward marker regex"));

static FORWARD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Forwarded From|转发自)[:\s]*(.+)").expect("forward line regex"));

/// Extract the provenance source from a plain-text body.
///
/// Captures the trailing text on the marker line.
pub fn extract_from_text(text: &str) -> Option<String> {
    let captured = FORWARD_LINE.captures(text)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        None
    } else {
        Some(captured.to_string())
    }
}

/// Remove the forwarding declaration from a text run.
///
/// Drops everything from the marker to the end of its line, then trims.
pub fn strip_declaration(text: &str) -> String {
    static DECLARATION: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(Forwarded From|转发自).*").expect("declaration regex"));
    DECLARATION.replace_all(text, "").trim().to_string()
}

/// Extract the provenance source from an HTML body and remove the enclosing
/// block from the tree.
///
/// Searches anchors for the marker; the matched anchor's text (minus the
/// marker) becomes the source, and the anchor's enclosing block element is
/// detached so it never reaches the body walk.
pub fn extract_and_strip(doc: &mut Html) -> Option<String> {
    let hit = find_forward_anchor(doc)?;

    if let Some(mut node) = doc.tree.get_mut(hit.remove_id) {
        node.detach();
    }
    hit.source
}

struct ForwardAnchor {
    /// Node to detach: the anchor's enclosing block, or the anchor itself.
    remove_id: NodeId,
    /// Anchor text with the marker stripped, when non-blank.
    source: Option<String>,
}

fn find_forward_anchor(doc: &Html) -> Option<ForwardAnchor> {
    for node in doc.tree.nodes() {
        if !matches!(node.value(), Node::Element(e) if e.name() == "a") {
            continue;
        }

        let anchor = ElementRef::wrap(node)?;
        let text: String = anchor.text().collect();
        if !FORWARD_MARKER.is_match(&text) {
            continue;
        }

        let source = FORWARD_MARKER.replace_all(&text, "").trim().to_string();
        let remove_id = node
            .parent()
            .filter(|parent| {
                matches!(parent.value(), Node::Element(e) if e.name() != "html" && e.name() != "body")
            })
            .map(|parent| parent.id())
            .unwrap_or_else(|| node.id());

        return Some(ForwardAnchor {
            remove_id,
            source: if source.is_empty() { None } else { Some(source) },
        });
    }
    None
}
