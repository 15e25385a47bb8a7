pub mod aggregator;
pub mod config;
pub mod controller;
pub mod fetcher;
pub mod parser;
pub mod renderer;
pub mod types;

pub use aggregator::{fallback_items, NewsAggregator};
pub use config::{load_config, TickerConfig};
pub use controller::{Command, Phase, RenderSurface, TickerController, TickerHandle, TickerState};
pub use fetcher::{Fetch, ProxyFetcher};
pub use renderer::{LayoutConfig, ScrollPlan, TickerFrame, TickerRenderer};
pub use types::{FeedSource, FetchConfig, NewsItem, Result, TickerError};
