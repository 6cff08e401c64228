//! Metadata extraction for candidate bookmark URLs.
//!
//! Fetches a page and heuristically pulls a title and description out of the
//! raw markup with regular expressions. No DOM is built, so malformed or
//! unusual markup may yield nothing; callers treat the result as a hint.

use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};

use crate::types::errors::MetadataError;
use crate::types::metadata::PageMetadata;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; MetadataBot/1.0)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("valid regex"));

static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| meta_content_regex("property", "og:title"));

static OG_DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| meta_content_regex("property", "og:description"));

static META_DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| meta_content_regex("name", "description"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(#x[0-9a-f]+|#[0-9]+|[a-z]+);").expect("valid regex"));

/// `<meta ... attr="value" ... content="...">`, with the identifying attribute before `content`.
fn meta_content_regex(attr: &str, value: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]*{}=["']{}["'][^>]*content=["']([^"']+)["']"#,
        attr,
        regex::escape(value)
    );
    Regex::new(&pattern).expect("valid regex")
}

/// Decodes the five XML entities plus decimal and hex character references.
///
/// Runs in a single pass, so text produced by a replacement is never decoded
/// again (`&amp;lt;` becomes `&lt;`). Unknown names and references that are
/// not valid Unicode scalar values stay as written.
pub fn decode_html_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| match decode_entity(&caps[1]) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match body.to_ascii_lowercase().as_str() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// First non-empty, trimmed and decoded capture among `patterns`, in order.
fn first_match(html: &str, patterns: &[&Regex]) -> String {
    patterns
        .iter()
        .filter_map(|re| re.captures(html))
        .map(|caps| decode_html_entities(caps[1].trim()))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Extracts a title (`<title>`, then `og:title`) and a description
/// (`og:description`, then `<meta name="description">`) from raw markup.
pub fn extract_metadata(html: &str) -> PageMetadata {
    PageMetadata {
        title: first_match(html, &[&*TITLE_RE, &*OG_TITLE_RE]),
        description: first_match(html, &[&*OG_DESCRIPTION_RE, &*META_DESCRIPTION_RE]),
    }
}

/// Suggests an `https://` prefix for a URL typed without a scheme.
///
/// Only fires when the input looks like a host (contains a dot).
pub fn suggest_https(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") || !url.contains('.') {
        return None;
    }
    Some(format!("https://{}", url))
}

/// Copies fetched metadata into form fields the user has left empty.
pub fn prefill(metadata: &PageMetadata, name: &mut String, description: &mut String) {
    if name.is_empty() && !metadata.title.is_empty() {
        *name = metadata.title.clone();
    }
    if description.is_empty() && !metadata.description.is_empty() {
        *description = metadata.description.clone();
    }
}

/// HTTP client that fetches pages and runs [`extract_metadata`] on the body.
#[derive(Clone)]
pub struct MetadataFetcher {
    client: reqwest::Client,
}

impl MetadataFetcher {
    /// Builds a fetcher with the bot user agent and the default timeout.
    pub fn new() -> Result<Self, MetadataError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Uses a preconfigured client, e.g. one shared with the rest of the process.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and extracts its metadata.
    ///
    /// # Errors
    /// - `MissingUrl` when `url` is blank
    /// - `FetchFailed` when the server answers with a non-success status
    /// - `Network` when the request or the body read fails
    pub async fn fetch(&self, url: &str) -> Result<PageMetadata, MetadataError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(MetadataError::MissingUrl);
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(url, error = %e, "metadata request failed");
            MetadataError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "metadata fetch returned non-success status");
            return Err(MetadataError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let metadata = extract_metadata(&html);
        tracing::debug!(url, title = %metadata.title, "extracted page metadata");
        Ok(metadata)
    }
}
