use async_trait::async_trait;
use rss_ticker::{
    fallback_items, Command, Fetch, FeedSource, LayoutConfig, NewsAggregator, Phase,
    RenderSurface, Result, TickerController, TickerError, TickerFrame, TickerHandle,
    TickerRenderer,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tracing::info;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Serves canned feed bodies by URL and counts every fetch.
struct StubFetch {
    bodies: HashMap<String, String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Fetch for StubFetch {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| TickerError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            })
    }
}

#[derive(Default)]
struct RecordingSurface {
    frames: Vec<TickerFrame>,
    play_states: Vec<bool>,
}

impl RenderSurface for RecordingSurface {
    fn apply_frame(&mut self, frame: &TickerFrame) {
        self.frames.push(frame.clone());
    }

    fn set_play_state(&mut self, paused: bool) {
        self.play_states.push(paused);
    }
}

fn rss_feed(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .map(|t| format!("<item><title>{t}</title><link>https://example.com/{t}</link></item>"))
        .collect();
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>{items}</channel></rss>"#
    )
}

const FEED_URL: &str = "https://feeds.example.com/news";

fn make_controller(
    bodies: HashMap<String, String>,
) -> (
    TickerController<StubFetch, RecordingSurface>,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = StubFetch {
        bodies,
        calls: calls.clone(),
    };
    let aggregator = NewsAggregator::new(fetcher, vec![FeedSource::new(FEED_URL)], 30);
    let renderer = TickerRenderer::new(LayoutConfig::default());
    let controller = TickerController::new(
        aggregator,
        renderer,
        RecordingSurface::default(),
        10_000.0,
        Duration::from_secs(120),
    );
    (controller, calls)
}

fn healthy_bodies() -> HashMap<String, String> {
    HashMap::from([(FEED_URL.to_string(), rss_feed(&["alpha", "beta"]))])
}

#[tokio::test]
async fn initial_cycle_transitions_and_renders() {
    init_tracing();

    let (mut controller, calls) = make_controller(healthy_bodies());
    assert_eq!(controller.state().phase, Phase::Idle);

    controller.refresh_now().await;

    assert_eq!(controller.state().phase, Phase::Rendered);
    assert_eq!(controller.state().items.len(), 2);
    assert!(controller.state().last_plan.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.surface().frames.len(), 1);
    assert_eq!(controller.surface().play_states, vec![false]);
    info!("initial cycle rendered {} items", controller.state().items.len());
}

#[tokio::test]
async fn pause_and_resume_do_not_rebuild_or_fetch() {
    init_tracing();

    let (mut controller, calls) = make_controller(healthy_bodies());
    controller.refresh_now().await;
    let frames_after_render = controller.surface().frames.len();

    controller.handle_command(Command::Pause).await;
    assert!(controller.state().paused);
    assert_eq!(controller.state().phase, Phase::Rendered, "pause leaves the cycle phase alone");
    assert_eq!(
        controller.surface().frames.len(),
        frames_after_render,
        "pausing must not rebuild the banner"
    );
    assert_eq!(controller.surface().play_states.last(), Some(&true));

    controller.handle_command(Command::Resume).await;
    assert!(!controller.state().paused);
    assert_eq!(controller.surface().play_states.last(), Some(&false));

    controller.handle_command(Command::TogglePause).await;
    assert!(controller.state().paused);

    assert_eq!(calls.load(Ordering::SeqCst), 1, "pause controls never touch the network");
}

#[tokio::test]
async fn refresh_command_fetches_again() {
    init_tracing();

    let (mut controller, calls) = make_controller(healthy_bodies());
    controller.refresh_now().await;
    controller.handle_command(Command::Refresh).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(controller.surface().frames.len(), 2);
    assert_eq!(controller.state().phase, Phase::Rendered);
}

#[tokio::test]
async fn resize_rerenders_from_cache_without_fetching() {
    init_tracing();

    let wide_title = "wide".repeat(100);
    let (mut controller, calls) = make_controller(HashMap::from([(
        FEED_URL.to_string(),
        rss_feed(&[wide_title.as_str()]),
    )]));
    controller.refresh_now().await;

    let frames_after_render = controller.surface().frames.len();
    controller.handle_command(Command::Resize(50.0)).await;

    assert_eq!(controller.surface().frames.len(), frames_after_render + 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "resize re-renders cached items only");
    assert_eq!(controller.state().viewport_width_px, 50.0);
    assert!(
        matches!(
            controller.state().last_plan,
            Some(rss_ticker::ScrollPlan::Scroll { .. })
        ),
        "narrowing the viewport below the content width forces a scroll plan"
    );
}

#[tokio::test]
async fn resize_before_first_render_only_records_width() {
    let (mut controller, calls) = make_controller(healthy_bodies());

    controller.handle_command(Command::Resize(640.0)).await;

    assert_eq!(controller.state().viewport_width_px, 640.0);
    assert_eq!(controller.state().phase, Phase::Idle);
    assert!(controller.surface().frames.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_cycle_still_renders_fallback() {
    init_tracing();

    let (mut controller, _calls) = make_controller(HashMap::new());
    controller.refresh_now().await;

    assert_eq!(controller.state().phase, Phase::Rendered);
    assert_eq!(controller.state().items, fallback_items());
    assert_eq!(
        controller.surface().frames.len(),
        1,
        "every cycle ends in a render call, however it resolves"
    );
}

#[tokio::test]
async fn pause_state_survives_a_refresh() {
    init_tracing();

    let (mut controller, _calls) = make_controller(healthy_bodies());
    controller.refresh_now().await;
    controller.handle_command(Command::Pause).await;
    controller.handle_command(Command::Refresh).await;

    assert!(controller.state().paused);
    assert_eq!(
        controller.surface().play_states.last(),
        Some(&true),
        "a frame applied while paused starts paused"
    );
}

#[tokio::test]
async fn handle_maps_actions_onto_commands() {
    let (handle, mut commands) = TickerHandle::channel();

    handle.refresh();
    handle.pause();
    handle.resume();
    handle.toggle_pause();
    handle.resize(800.0);

    assert_eq!(commands.recv().await, Some(Command::Refresh));
    assert_eq!(commands.recv().await, Some(Command::Pause));
    assert_eq!(commands.recv().await, Some(Command::Resume));
    assert_eq!(commands.recv().await, Some(Command::TogglePause));
    assert_eq!(commands.recv().await, Some(Command::Resize(800.0)));
}
