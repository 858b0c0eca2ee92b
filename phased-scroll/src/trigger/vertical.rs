//! Bottom-proximity trigger for the two vertical phases.
use std::time::Duration;

use tracing::trace;

use crate::{
    clock::TimerKey,
    debounce::TrailingDebounce,
    geometry::PageMetrics,
    phase::Phase,
    px::Px,
    task::{FeedTask, FeedTimers},
    trigger::TriggerContext,
};

/// Whether the viewport bottom is within `threshold` of the document end.
///
/// ```
/// use phased_scroll::{geometry::PageMetrics, px::Px, trigger::vertical::is_near_bottom};
///
/// let page = PageMetrics {
///     scroll_top: Px(800),
///     viewport_height: Px(800),
///     viewport_width: Px(1280),
///     document_height: Px(1500),
/// };
/// assert!(is_near_bottom(&page, Px(100)));
/// ```
pub fn is_near_bottom(page: &PageMetrics, threshold: Px) -> bool {
    page.viewport_bottom() >= page.document_height.saturating_sub(threshold)
}

/// Requests the next item when a debounced page scroll lands near the bottom
/// of the document.
#[derive(Debug, Clone)]
pub struct VerticalTrigger {
    debounce: TrailingDebounce,
    bottom_threshold: Px,
    active: bool,
}

impl VerticalTrigger {
    /// Creates an inactive trigger.
    pub fn new(debounce_window: Duration, bottom_threshold: Px) -> Self {
        Self {
            debounce: TrailingDebounce::new(debounce_window),
            bottom_threshold,
            active: false,
        }
    }

    /// Starts listening for page scroll.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stops listening and cancels a pending check.
    pub fn deactivate(&mut self, timers: &mut FeedTimers) {
        self.active = false;
        self.debounce.cancel(timers);
    }

    /// Whether the trigger is listening.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a debounced check is pending.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    /// Records a page scroll sample. The check runs one debounce window after
    /// the last sample.
    pub fn on_page_scroll(&mut self, ctx: &mut TriggerContext<'_>) {
        if !self.active {
            return;
        }
        self.debounce
            .trigger(&mut *ctx.timers, ctx.now, FeedTask::VerticalCheck);
    }

    /// Handles a fired timer. Returns `true` if it was this trigger's check.
    pub fn on_timer(&mut self, ctx: &mut TriggerContext<'_>, key: TimerKey) -> bool {
        if !self.debounce.fired(key) {
            return false;
        }
        if self.active {
            self.check(ctx);
        }
        true
    }

    fn check(&self, ctx: &mut TriggerContext<'_>) {
        if ctx.is_loading() || ctx.sequencer.is_exhausted() {
            return;
        }
        let page = match ctx.geometry.page() {
            Ok(page) => page,
            Err(err) => {
                trace!(%err, "vertical check skipped");
                return;
            }
        };
        if !is_near_bottom(&page, self.bottom_threshold) {
            return;
        }

        if ctx.phase == Phase::FinalVertical {
            let section = match ctx.geometry.horizontal_section() {
                Ok(section) => section,
                Err(err) => {
                    trace!(%err, "vertical check skipped");
                    return;
                }
            };
            if page.viewport_bottom() <= section.bottom() {
                trace!(
                    viewport_bottom = page.viewport_bottom().raw(),
                    section_bottom = section.bottom().raw(),
                    "still inside horizontal section"
                );
                return;
            }
        }

        ctx.request_next();
    }
}
