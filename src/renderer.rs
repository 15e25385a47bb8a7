use crate::parser::escape_html;
use crate::types::NewsItem;
use serde::Deserialize;

/// Icons rotated across items whose source declares none.
const DEFAULT_ICONS: [&str; 3] = ["\u{1F510}", "\u{1F6E1}\u{FE0F}", "\u{26A0}\u{FE0F}"];

/// Shown when the renderer is handed an empty list.
pub const EMPTY_PLACEHOLDER: &str =
    "<span class=\"rss-item\">\u{1F4E1} No items to display</span>";

/// Layout constants for the scrolling banner: 0.025 s per pixel of travel,
/// an 8 s duration floor, a 30 px inter-loop gap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Seconds of animation per pixel of travel; scroll speed is constant
    /// regardless of content length.
    pub secs_per_pixel: f64,
    /// Floor on the animation duration so short content never scrolls
    /// unreadably fast.
    pub min_duration_secs: f64,
    /// Gap between the end of one loop and the start of the next, in pixels.
    pub loop_gap_px: f64,
    /// Estimated width of one rendered glyph, in pixels.
    pub glyph_width_px: f64,
    /// Horizontal padding and margin around one item, in pixels.
    pub item_padding_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            secs_per_pixel: 0.025,
            min_duration_secs: 8.0,
            loop_gap_px: 30.0,
            glyph_width_px: 9.0,
            item_padding_px: 48.0,
        }
    }
}

/// Animation parameters for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollPlan {
    /// Content fits the viewport: no animation, left-aligned.
    Static,
    /// Content overflows: translate by `translate_px` over `duration_secs`,
    /// looping.
    Scroll {
        translate_px: f64,
        duration_secs: f64,
    },
}

/// One complete rendering pass: the item strip markup plus its scroll plan.
/// Frames are built from scratch on every pass; no animation state carries
/// over from the previous cycle.
#[derive(Debug, Clone)]
pub struct TickerFrame {
    pub strip: String,
    pub plan: ScrollPlan,
}

impl TickerFrame {
    pub fn is_static(&self) -> bool {
        matches!(self.plan, ScrollPlan::Static)
    }

    /// Banner markup for a fixed-height region. When scrolling, the strip is
    /// emitted twice so the loop wraps seamlessly.
    pub fn banner_html(&self) -> String {
        match &self.plan {
            ScrollPlan::Static => format!(
                "<div class=\"rss-viewport\" style=\"transform: translateX(0); animation: none;\">{}</div>",
                self.strip
            ),
            ScrollPlan::Scroll {
                translate_px,
                duration_secs,
            } => format!(
                "<div class=\"rss-viewport\" style=\"--translate-x: -{translate_px:.0}px; animation: scroll-x {duration_secs:.2}s linear infinite;\">{strip}{strip}</div>",
                strip = self.strip
            ),
        }
    }
}

/// Pure renderer: item list + viewport width in, frame out. Re-invoking it
/// with the same items (a viewport resize, for instance) needs no fetch and
/// has no side effects.
pub struct TickerRenderer {
    layout: LayoutConfig,
}

impl TickerRenderer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn render(&self, items: &[NewsItem], viewport_width_px: f64) -> TickerFrame {
        let strip = self.build_strip(items);
        let content_width = self.estimate_width(items);
        let plan = self.plan_scroll(content_width, viewport_width_px);
        TickerFrame { strip, plan }
    }

    fn build_strip(&self, items: &[NewsItem]) -> String {
        if items.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let icon = item
                    .icon
                    .as_deref()
                    .unwrap_or(DEFAULT_ICONS[index % DEFAULT_ICONS.len()]);
                // Titles arrive pre-escaped from the parser; hrefs are
                // escaped here where they meet attribute context.
                format!(
                    "<span class=\"rss-item\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{} {}</a></span>",
                    escape_html(&item.link),
                    icon,
                    item.title
                )
            })
            .collect()
    }

    /// Deterministic stand-in for a layout measurement: glyph count times a
    /// fixed glyph width, plus per-item padding. Escaped entities overcount
    /// glyphs slightly; only pacing is affected.
    fn estimate_width(&self, items: &[NewsItem]) -> f64 {
        items
            .iter()
            .map(|item| {
                let glyphs = item.title.chars().count() as f64 + 2.0;
                glyphs * self.layout.glyph_width_px + self.layout.item_padding_px
            })
            .sum()
    }

    fn plan_scroll(&self, content_width_px: f64, viewport_width_px: f64) -> ScrollPlan {
        if content_width_px <= viewport_width_px {
            return ScrollPlan::Static;
        }

        let translate_px = content_width_px + self.layout.loop_gap_px;
        let duration_secs =
            (translate_px * self.layout.secs_per_pixel).max(self.layout.min_duration_secs);

        ScrollPlan::Scroll {
            translate_px,
            duration_secs,
        }
    }
}
