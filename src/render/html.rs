//! HTML body walk.
//!
//! Depth-first traversal of an entry's HTML body producing ordered body
//! tokens. Image tokens carry the raw `src` URL; resolution happens in the
//! renderer so the walk itself stays synchronous.

use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

use crate::render::provenance;

/// One ordered token from the body walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyToken {
    /// A run of normalized text.
    Text(String),
    /// An `img` element's source URL (possibly empty when `src` is missing).
    Image(String),
    /// A `br` element.
    LineBreak,
}

/// Walk an HTML body depth-first, producing tokens in document order.
///
/// Rules per node:
/// - text: whitespace runs collapsed, forwarding declarations stripped,
///   emitted when non-empty
/// - `img`: one Image token, always
/// - `br`: one LineBreak token
/// - `a`: its text, only when it differs from the `href` target
/// - anything else: recurse into children
pub fn walk(doc: &Html) -> Vec<BodyToken> {
    let mut tokens = Vec::new();
    for child in doc.root_element().children() {
        visit(child, &mut tokens);
    }
    tokens
}

fn visit(node: NodeRef<'_, Node>, out: &mut Vec<BodyToken>) {
    match node.value() {
        Node::Text(text) => {
            let text = normalize_whitespace(&provenance::strip_declaration(text));
            if !text.is_empty() {
                out.push(BodyToken::Text(text));
            }
        }
        Node::Element(element) => match element.name() {
            "img" => {
                out.push(BodyToken::Image(
                    element.attr("src").unwrap_or_default().to_string(),
                ));
            }
            "br" => out.push(BodyToken::LineBreak),
            "a" => {
                let text = ElementRef::wrap(node)
                    .map(|a| normalize_whitespace(&a.text().collect::<String>()))
                    .unwrap_or_default();
                let href = element.attr("href").unwrap_or_default();
                // A bare URL repeated as both href and text is suppressed
                if !text.is_empty() && text != href {
                    out.push(BodyToken::Text(text));
                }
            }
            _ => {
                for child in node.children() {
                    visit(child, out);
                }
            }
        },
        _ => {}
    }
}

static ANCHOR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("anchor tag regex"));

static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("bare URL regex"));

/// Clean a plain-text body: reduce raw anchor tags to their text, strip bare
/// `http(s)://` tokens, and normalize line whitespace.
pub fn plain_text_body(text: &str) -> String {
    let text = provenance::strip_declaration(text);
    let text = ANCHOR_TAG.replace_all(&text, "$1");
    let text = BARE_URL.replace_all(&text, "");

    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    lines.join("\n").trim().to_string()
}

/// Collapse internal whitespace runs to single spaces and trim.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_html(html: &str) -> Vec<BodyToken> {
        walk(&Html::parse_fragment(html))
    }

    #[test]
    fn test_walk_text_normalization() {
        let tokens = walk_html("<p>  hello \n\t world  </p>");
        assert_eq!(tokens, vec![BodyToken::Text("hello world".to_string())]);
    }

    #[test]
    fn test_walk_skips_empty_text() {
        let tokens = walk_html("<p>   </p><p>x</p>");
        assert_eq!(tokens, vec![BodyToken::Text("x".to_string())]);
    }

    #[test]
    fn test_walk_img_and_br() {
        let tokens = walk_html("a<br><img src=\"http://x.test/i.png\">b");
        assert_eq!(
            tokens,
            vec![
                BodyToken::Text("a".to_string()),
                BodyToken::LineBreak,
                BodyToken::Image("http://x.test/i.png".to_string()),
                BodyToken::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_walk_img_without_src() {
        // Still exactly one token per img element
        let tokens = walk_html("<img>");
        assert_eq!(tokens, vec![BodyToken::Image(String::new())]);
    }

    #[test]
    fn test_walk_anchor_suppression() {
        let tokens = walk_html("<a href=\"http://x.test/p\">http://x.test/p</a>");
        assert!(tokens.is_empty());

        let tokens = walk_html("<a href=\"http://x.test/p\">Click here</a>");
        assert_eq!(tokens, vec![BodyToken::Text("Click here".to_string())]);
    }

    #[test]
    fn test_walk_recurses_into_containers() {
        let tokens = walk_html("<div><span>deep</span><blockquote>quote</blockquote></div>");
        assert_eq!(
            tokens,
            vec![
                BodyToken::Text("deep".to_string()),
                BodyToken::Text("quote".to_string()),
            ]
        );
    }

    #[test]
    fn test_walk_strips_forward_declaration_text() {
        let tokens = walk_html("<p>Forwarded From somewhere</p><p>kept</p>");
        assert_eq!(tokens, vec![BodyToken::Text("kept".to_string())]);
    }

    #[test]
    fn test_plain_text_body_strips_bare_urls() {
        assert_eq!(plain_text_body("see http://x.test/r/1"), "see");
        assert_eq!(plain_text_body("both https://a.test and http://b.test"), "both and");
    }

    #[test]
    fn test_plain_text_body_reduces_anchor_tags() {
        assert_eq!(
            plain_text_body("<a href=\"http://x.test/p\">text</a> tail"),
            "text tail"
        );
    }

    #[test]
    fn test_plain_text_body_keeps_lines() {
        assert_eq!(plain_text_body("one\ntwo  three"), "one\ntwo three");
    }
}
