use crate::renderer::LayoutConfig;
use crate::types::FeedSource;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_DISPLAY_CAP: usize = 30;
pub const DEFAULT_VIEWPORT_WIDTH_PX: f64 = 960.0;

/// Full ticker configuration, loadable from a JSON file:
///
/// ```json
/// {
///   "proxy_url": "https://api.allorigins.win/raw",
///   "refresh_interval_secs": 120,
///   "display_cap": 30,
///   "viewport_width_px": 960.0,
///   "sources": [
///     { "url": "https://feeds.feedburner.com/TheHackersNews", "max_items": 20 }
///   ]
/// }
/// ```
///
/// Every field is optional; omitted fields keep the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Relay endpoint; the target feed URL travels as its `url` query
    /// parameter.
    pub proxy_url: String,
    pub sources: Vec<FeedSource>,
    /// Cap on the merged list, applied after per-source caps.
    pub display_cap: usize,
    pub refresh_interval_secs: u64,
    pub viewport_width_px: f64,
    pub layout: LayoutConfig,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            sources: default_sources(),
            display_cap: DEFAULT_DISPLAY_CAP,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            viewport_width_px: DEFAULT_VIEWPORT_WIDTH_PX,
            layout: LayoutConfig::default(),
        }
    }
}

/// Default security-news source set.
pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://feeds.feedburner.com/TheHackersNews"),
        FeedSource::new("https://www.bleepingcomputer.com/feed/")
            .with_max_items(10)
            .with_icon("\u{1F6E1}\u{FE0F}"),
        FeedSource::new("https://krebsonsecurity.com/feed/")
            .with_max_items(10)
            .with_icon("\u{1F50D}"),
    ]
}

/// Load configuration from a JSON file, or fall back to the defaults when no
/// path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<TickerConfig> {
    let Some(path) = path else {
        return Ok(TickerConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: TickerConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
