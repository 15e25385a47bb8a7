use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One monitored feed endpoint, fixed at configuration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    /// Upper bound on items taken from this source per cycle.
    #[serde(default = "default_source_cap")]
    pub max_items: usize,
    /// Display hint for items from this source. Items without one get a
    /// rotating default icon at render time.
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_source_cap() -> usize {
    20
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_items: default_source_cap(),
            icon: None,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A normalized feed entry. Produced fresh on every fetch cycle and replaced
/// wholesale by the next cycle; nothing here survives a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Display title, already HTML-escaped. Never empty: the parser
    /// substitutes a placeholder for missing or blank titles.
    pub title: String,
    /// Target URL, or the `#` sentinel when the source carried no link.
    pub link: String,
    /// Publication timestamp when the source provides one. Never defaulted.
    pub published_at: Option<DateTime<Utc>>,
    /// Source display icon stamped on by the aggregator.
    pub icon: Option<String>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_at: None,
            icon: None,
        }
    }
}

/// HTTP client tuning for the fetch gateway.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "rss-ticker/0.1".to_string(),
            timeout_seconds: 15,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("feed parse error: {0}")]
    Parse(String),
}

impl TickerError {
    /// Network failure or non-success status; scoped to one source.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TickerError::Http(_) | TickerError::Status { .. } | TickerError::InvalidUrl(_)
        )
    }

    /// Payload could not be interpreted as feed content.
    pub fn is_parse(&self) -> bool {
        matches!(self, TickerError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, TickerError>;
