use clap::Parser;
use rss_ticker::{
    config, FetchConfig, NewsAggregator, ProxyFetcher, RenderSurface, TickerController,
    TickerFrame, TickerHandle, TickerRenderer,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rss-ticker")]
#[command(about = "Aggregates news feeds into a scrolling banner")]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the refresh interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Override the banner viewport width in pixels
    #[arg(long)]
    viewport: Option<f64>,

    /// Run a single fetch-and-render cycle and exit
    #[arg(long)]
    once: bool,
}

/// Prints each rendered banner to stdout; play-state changes go to the log.
struct StdoutSurface;

impl RenderSurface for StdoutSurface {
    fn apply_frame(&mut self, frame: &TickerFrame) {
        println!("{}", frame.banner_html());
    }

    fn set_play_state(&mut self, paused: bool) {
        info!("ticker animation {}", if paused { "paused" } else { "running" });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut ticker_config = config::load_config(cli.config.as_deref())?;
    if let Some(secs) = cli.interval {
        ticker_config.refresh_interval_secs = secs;
    }
    if let Some(width) = cli.viewport {
        ticker_config.viewport_width_px = width;
    }

    info!(
        "starting rss-ticker: {} sources via {}, refreshing every {}s",
        ticker_config.sources.len(),
        ticker_config.proxy_url,
        ticker_config.refresh_interval_secs
    );

    let fetcher = ProxyFetcher::new(ticker_config.proxy_url.clone(), FetchConfig::default())?;
    let aggregator = NewsAggregator::new(
        fetcher,
        ticker_config.sources.clone(),
        ticker_config.display_cap,
    );
    let renderer = TickerRenderer::new(ticker_config.layout.clone());

    let mut controller = TickerController::new(
        aggregator,
        renderer,
        StdoutSurface,
        ticker_config.viewport_width_px,
        Duration::from_secs(ticker_config.refresh_interval_secs),
    );

    if cli.once {
        controller.refresh_now().await;
        return Ok(());
    }

    // The handle stays alive for the process lifetime; resize, refresh and
    // pause arrive through clones of it.
    let (_handle, commands) = TickerHandle::channel();
    controller.run(commands).await;
    Ok(())
}
