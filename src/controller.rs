use crate::aggregator::NewsAggregator;
use crate::fetcher::Fetch;
use crate::renderer::{ScrollPlan, TickerFrame, TickerRenderer};
use crate::types::NewsItem;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Fetch-cycle phase. Orthogonal to the paused flag, which modulates only the
/// animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Rendered,
}

/// External controls. No arguments beyond the resize width, no return values.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh,
    Pause,
    Resume,
    TogglePause,
    Resize(f64),
}

/// The single rendering side effect. Everything upstream of this trait is
/// pure data transformation.
pub trait RenderSurface: Send {
    /// Replace the displayed banner with a freshly built frame.
    fn apply_frame(&mut self, frame: &TickerFrame);

    /// Flip the animation play state. Must not rebuild the banner or reset
    /// scroll position.
    fn set_play_state(&mut self, paused: bool);
}

/// Transient ticker state, owned by the controller and rebuilt in place on
/// every refresh or resize.
#[derive(Debug)]
pub struct TickerState {
    pub items: Vec<NewsItem>,
    pub paused: bool,
    pub phase: Phase,
    pub viewport_width_px: f64,
    pub last_plan: Option<ScrollPlan>,
}

impl TickerState {
    fn new(viewport_width_px: f64) -> Self {
        Self {
            items: Vec::new(),
            paused: false,
            phase: Phase::Idle,
            viewport_width_px,
            last_plan: None,
        }
    }
}

/// Cloneable sender for the controller's command channel.
#[derive(Debug, Clone)]
pub struct TickerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl TickerHandle {
    /// Create a handle and the receiver to drive a controller with.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (Self { commands }, receiver)
    }

    /// Force one immediate fetch cycle.
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }

    pub fn pause(&self) {
        let _ = self.commands.send(Command::Pause);
    }

    pub fn resume(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    pub fn toggle_pause(&self) {
        let _ = self.commands.send(Command::TogglePause);
    }

    /// Re-render for a new viewport width using cached items; no fetch.
    pub fn resize(&self, viewport_width_px: f64) {
        let _ = self.commands.send(Command::Resize(viewport_width_px));
    }
}

/// Owns the refresh timer, the ticker state, and the rendering surface. Runs
/// for the process lifetime; there is no terminal state.
pub struct TickerController<F: Fetch, S: RenderSurface> {
    aggregator: NewsAggregator<F>,
    renderer: TickerRenderer,
    surface: S,
    state: TickerState,
    refresh_interval: Duration,
}

impl<F: Fetch, S: RenderSurface> TickerController<F, S> {
    pub fn new(
        aggregator: NewsAggregator<F>,
        renderer: TickerRenderer,
        surface: S,
        viewport_width_px: f64,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            renderer,
            surface,
            state: TickerState::new(viewport_width_px),
            refresh_interval,
        }
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run one full fetch-and-render cycle. However the aggregation resolves,
    /// the cycle ends in a render call.
    pub async fn refresh_now(&mut self) {
        self.state.phase = Phase::Loading;
        debug!("refresh cycle started");

        self.state.items = self.aggregator.collect().await;
        self.render_current();

        self.state.phase = Phase::Rendered;
        info!("refresh cycle complete, {} items on the ticker", self.state.items.len());
    }

    /// Toggle the animation without touching the fetch cycle or the frame.
    pub fn set_paused(&mut self, paused: bool) {
        if self.state.paused == paused {
            return;
        }
        self.state.paused = paused;
        self.surface.set_play_state(paused);
        debug!("ticker animation {}", if paused { "paused" } else { "running" });
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.state.paused);
    }

    /// Re-render from cached items for a new viewport width. No fetch, no
    /// phase change.
    pub fn resize(&mut self, viewport_width_px: f64) {
        self.state.viewport_width_px = viewport_width_px;
        if self.state.phase == Phase::Rendered {
            self.render_current();
        }
    }

    pub async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Refresh => self.refresh_now().await,
            Command::Pause => self.set_paused(true),
            Command::Resume => self.set_paused(false),
            Command::TogglePause => self.toggle_pause(),
            Command::Resize(width) => self.resize(width),
        }
    }

    fn render_current(&mut self) {
        let frame = self
            .renderer
            .render(&self.state.items, self.state.viewport_width_px);
        self.state.last_plan = Some(frame.plan.clone());
        self.surface.apply_frame(&frame);
        self.surface.set_play_state(self.state.paused);
    }

    /// Initial cycle, then periodic refreshes interleaved with commands.
    /// Cycles supersede each other last-writer-wins; commands and ticks are
    /// drained from one loop, so no cross-cycle locking is needed.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.refresh_now().await;

        let mut timer = interval(self.refresh_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial cycle already ran.
        timer.tick().await;

        let mut commands_open = true;
        loop {
            tokio::select! {
                _ = timer.tick() => self.refresh_now().await,
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("all ticker handles dropped, timer keeps the banner fresh");
                        commands_open = false;
                    }
                },
            }
        }
    }
}
