use crate::fetcher::Fetch;
use crate::parser;
use crate::types::{FeedSource, NewsItem, Result};
use futures::future;
use tracing::{debug, warn};

/// Runs the fetch gateway and parser across all configured sources and merges
/// the results. This is the failure-isolation boundary of the pipeline: a
/// source that fails this cycle contributes an empty list, never an error.
pub struct NewsAggregator<F: Fetch> {
    fetcher: F,
    sources: Vec<FeedSource>,
    display_cap: usize,
}

impl<F: Fetch> NewsAggregator<F> {
    pub fn new(fetcher: F, sources: Vec<FeedSource>, display_cap: usize) -> Self {
        Self {
            fetcher,
            sources,
            display_cap,
        }
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Run one aggregation cycle. Infallible: per-source failures are
    /// contained here, and an empty merge switches to the static fallback
    /// list so the ticker is never blank.
    ///
    /// All sources are fetched concurrently and joined once every request has
    /// settled, so cycle latency is bounded by the slowest source. The merge
    /// preserves source declaration order regardless of response arrival
    /// order.
    pub async fn collect(&self) -> Vec<NewsItem> {
        let cycles = self.sources.iter().map(|source| self.collect_source(source));
        let per_source = future::join_all(cycles).await;

        let mut merged: Vec<NewsItem> = per_source.into_iter().flatten().collect();
        merged.truncate(self.display_cap);

        if merged.is_empty() {
            debug!("all sources failed or returned nothing, using fallback items");
            return fallback_items();
        }

        merged
    }

    async fn collect_source(&self, source: &FeedSource) -> Vec<NewsItem> {
        match self.fetch_and_parse(source).await {
            Ok(items) => {
                debug!("source {} yielded {} items", source.url, items.len());
                items
            }
            Err(err) if err.is_parse() => {
                warn!("source {} returned unreadable content: {}", source.url, err);
                Vec::new()
            }
            Err(err) => {
                warn!("source {} unreachable this cycle: {}", source.url, err);
                Vec::new()
            }
        }
    }

    async fn fetch_and_parse(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        let body = self.fetcher.fetch_text(&source.url).await?;
        let mut items = parser::parse_items(&body, source.max_items)?;
        if let Some(icon) = &source.icon {
            for item in &mut items {
                item.icon = Some(icon.clone());
            }
        }
        Ok(items)
    }
}

/// Fixed fallback shown when every source failed or returned nothing.
pub fn fallback_items() -> Vec<NewsItem> {
    vec![
        NewsItem::new("Live security feeds are temporarily unavailable", "#"),
        NewsItem::new("Check back shortly for the latest headlines", "#"),
    ]
}
