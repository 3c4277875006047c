//! Feed fetching and parsing.
//!
//! Downloads RSS/Atom feeds with SSRF protection and size limits, and maps
//! parsed entries into [`FeedEntry`] values for the renderer. The raw HTML
//! body of an entry is kept intact so the renderer can walk it.

use std::net::IpAddr;
use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::config::HttpConfig;
use crate::feed::types::{Enclosure, FeedEntry};
use crate::{RelayError, Result};

/// A parsed feed: channel metadata plus its entries.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    /// Feed title.
    pub title: String,
    /// Site URL the feed belongs to.
    pub site_url: Option<String>,
    /// Entries in feed order.
    pub entries: Vec<FeedEntry>,
}

/// Feed fetcher with SSRF protection and resource limits.
pub struct FeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a new fetcher from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RelayError::Feed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    /// Fetch and parse a feed from the given URL.
    ///
    /// The URL is validated against SSRF before any network access, and the
    /// response size is capped.
    pub async fn fetch(&self, url: &str) -> Result<FetchedFeed> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::Feed(format!("failed to fetch feed: {e}")))?;

        if !response.status().is_success() {
            return Err(RelayError::Feed(format!("HTTP error: {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(RelayError::Feed(format!(
                    "feed too large: {content_length} bytes (max {} bytes)",
                    self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Feed(format!("failed to read response: {e}")))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(RelayError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        parse_feed(&bytes)
    }
}

/// Validate a URL for SSRF protection.
///
/// Rejects non-http(s) schemes, private/loopback addresses and reserved
/// internal hostnames.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| RelayError::Validation(format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(RelayError::Validation(format!(
                "unsupported URL scheme: {scheme}"
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| RelayError::Validation("URL has no host".to_string()))?;

    match host {
        url::Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(RelayError::Validation(format!("forbidden host: {domain}")));
            }
        }
        url::Host::Ipv4(ipv4) => {
            if is_private_ip(&IpAddr::V4(ipv4)) {
                return Err(RelayError::Validation(format!(
                    "private IP address not allowed: {ipv4}"
                )));
            }
        }
        url::Host::Ipv6(ipv6) => {
            if is_private_ip(&IpAddr::V6(ipv6)) {
                return Err(RelayError::Validation(format!(
                    "private IP address not allowed: {ipv6}"
                )));
            }
        }
    }

    Ok(())
}

/// Check if a hostname is reserved for internal use.
fn is_forbidden_hostname(host: &str) -> bool {
    let host = host.to_lowercase();
    if host == "localhost" {
        return true;
    }
    [".local", ".localhost", ".internal", ".intranet", ".corp", ".home", ".lan"]
        .iter()
        .any(|suffix| host.ends_with(suffix))
}

/// Check if an IP address is private/reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                || v4.is_documentation()
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                // Unique local: fc00::/7
                || (segments[0] & 0xfe00) == 0xfc00
                // Link-local: fe80::/10
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Whether a declared content type denotes HTML markup.
fn is_html_type(content_type: &str) -> bool {
    content_type.contains("html")
}

/// Parse feed bytes into channel metadata and entries.
pub fn parse_feed(bytes: &[u8]) -> Result<FetchedFeed> {
    let feed =
        parser::parse(bytes).map_err(|e| RelayError::Feed(format!("failed to parse feed: {e}")))?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());
    let site_url = feed.links.first().map(|l| l.href.clone());

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            // Keep HTML bodies structured; anything declared as plain text
            // goes down the plain-text rendering path.
            let mut html = None;
            let mut text = None;
            if let Some(body) = entry.content.and_then(|c| {
                let is_html = is_html_type(&c.content_type.to_string());
                c.body.map(|b| (b, is_html))
            }) {
                match body {
                    (b, true) => html = Some(b),
                    (b, false) => text = Some(b),
                }
            } else if let Some(summary) = entry.summary {
                if is_html_type(&summary.content_type.to_string()) {
                    html = Some(summary.content);
                } else {
                    text = Some(summary.content);
                }
            }

            let enclosures = entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .filter_map(|c| {
                    c.url.as_ref().map(|u| Enclosure {
                        url: u.to_string(),
                        mime_type: c.content_type.as_ref().map(|m| m.to_string()),
                    })
                })
                .collect();

            FeedEntry {
                title,
                html,
                text,
                link: entry.links.first().map(|l| l.href.clone()),
                published_at: entry.published,
                updated_at: entry.updated,
                author: entry.authors.first().map(|a| a.name.clone()),
                categories: entry.categories.into_iter().map(|c| c.term).collect(),
                enclosures,
            }
        })
        .collect();

    Ok(FetchedFeed {
        title,
        site_url,
        entries,
    })
}
