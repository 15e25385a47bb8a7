use crate::types::{NewsItem, Result, TickerError};
use feed_rs::parser;
use tracing::debug;

/// Substituted when a source entry has no usable title.
pub const UNTITLED_PLACEHOLDER: &str = "(untitled)";

/// Non-navigating anchor target for entries without a link.
pub const LINK_PLACEHOLDER: &str = "#";

/// Parse raw feed markup into normalized items, truncated to `max_items`.
///
/// Accepts both RSS `item` and Atom `entry` containers. Malformed markup, or
/// a payload that is not feed markup at all (a relay error page, for
/// instance), fails with a parse error rather than returning an empty list —
/// the aggregator relies on that to tell "feed down" from "feed empty".
pub fn parse_items(content: &str, max_items: usize) -> Result<Vec<NewsItem>> {
    if !looks_like_feed(content) {
        return Err(TickerError::Parse(
            "payload carries no RSS or Atom markers".to_string(),
        ));
    }

    let feed = parser::parse(content.as_bytes())
        .map_err(|e| TickerError::Parse(format!("failed to parse feed: {e}")))?;

    let items: Vec<NewsItem> = feed
        .entries
        .into_iter()
        .take(max_items)
        .map(normalize_entry)
        .collect();

    debug!("parsed {} items from feed markup", items.len());
    Ok(items)
}

/// Structural validation: relays do not reliably preserve status codes or
/// content types, so the payload itself has to look like a feed before the
/// parser runs.
pub fn looks_like_feed(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("<rss")
        || lower.contains("<feed")
        || lower.contains("<channel")
        || lower.contains("<rdf")
        || lower.contains("xmlns=\"http://www.w3.org/2005/atom\"")
}

fn normalize_entry(entry: feed_rs::model::Entry) -> NewsItem {
    let raw_title = entry.title.map(|t| t.content).unwrap_or_default();
    let trimmed = raw_title.trim();
    let title = if trimmed.is_empty() {
        UNTITLED_PLACEHOLDER.to_string()
    } else {
        escape_html(trimmed)
    };

    // RSS carries the link as element text, Atom as an href attribute on a
    // self-closing element, optionally qualified by rel="alternate"; feed-rs
    // normalizes both into the links list.
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
        .unwrap_or_else(|| LINK_PLACEHOLDER.to_string());

    // Atom feeds often stamp only `updated`; a source with neither yields
    // None, never "now".
    let published_at = entry.published.or(entry.updated);

    NewsItem {
        title,
        link,
        published_at,
        icon: None,
    }
}

/// Escape the five HTML metacharacters so feed text embeds safely into
/// rendered markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
