use crate::types::{FetchConfig, Result, TickerError};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Seam between the aggregator and the network. Implemented by the proxy
/// fetcher in production and by stubs in tests.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the raw body text for a feed URL.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Fetch gateway that routes every request through a CORS-relay proxy.
///
/// Feed origins do not grant direct cross-origin access, so the relay is a
/// hard external dependency: the target URL travels as the `url` query
/// parameter and the relay returns the body verbatim. The relay is treated as
/// best-effort; any failure surfaces as a transport error for the caller to
/// contain.
pub struct ProxyFetcher {
    client: Client,
    proxy_url: String,
    config: FetchConfig,
}

impl ProxyFetcher {
    pub fn new(proxy_url: String, config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            proxy_url,
            config,
        })
    }

    fn relayed_url(&self, target: &str) -> Result<Url> {
        let mut relayed = Url::parse(&self.proxy_url)?;
        relayed.query_pairs_mut().append_pair("url", target);
        Ok(relayed)
    }

    async fn fetch_once(&self, relayed: &Url) -> Result<String> {
        // Every poll must observe fresh content, not a cached relay response.
        let response = self
            .client
            .get(relayed.clone())
            .header("Cache-Control", "no-store")
            .header("Pragma", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TickerError::Status {
                url: relayed.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetch for ProxyFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let relayed = self.relayed_url(url)?;
        debug!("fetching {} via {}", url, self.proxy_url);

        // max_elapsed_time stays None: retries are bounded by attempt count,
        // not wall clock.
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds.max(1) * 32),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut attempt = 0;
        loop {
            match self.fetch_once(&relayed).await {
                Ok(text) => {
                    debug!("fetched {} ({} bytes)", url, text.len());
                    return Ok(text);
                }
                Err(err) => {
                    if attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    match backoff.next_backoff() {
                        Some(delay) => {
                            warn!(
                                "attempt {} failed for {}: {}, retrying in {:?}",
                                attempt + 1,
                                url,
                                err,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(err),
                    }
                    attempt += 1;
                }
            }
        }
    }
}
