//! Horizontal strategy where the strip scrolls inside its own container.
//!
//! Native strip scrolls and redirected wheel events converge on one decision:
//! once the visible right edge of the strip passes a fraction of its
//! scrollable width, the next item is requested.
use std::time::Duration;

use derive_setters::Setters;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    clock::{TimerKey, TimerSource},
    geometry::StripMetrics,
    phase::HORIZONTAL_ITEMS,
    px::Px,
    task::{FeedTask, FeedTimers},
    trigger::{HorizontalTrigger, PinState, TriggerContext, WheelDelta, WheelDisposition},
};

const DEFAULT_THRESHOLD_FRACTION: f32 = 0.2;
const DEFAULT_WHEEL_SETTLE: Duration = Duration::from_millis(50);

/// Configuration of the nested-scroll strategy.
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct NestedScrollArgs {
    /// Fraction of the strip's scroll width the visible right edge must reach.
    pub threshold_fraction: f32,
    /// Delay between a redirected wheel event and the decision it causes.
    pub wheel_settle: Duration,
    /// Auto-advance out of the horizontal phase once its items are loaded.
    /// Without it the feed stays in the horizontal phase at 30 items.
    pub exit_delay: Option<Duration>,
}

impl Default for NestedScrollArgs {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
            wheel_settle: DEFAULT_WHEEL_SETTLE,
            exit_delay: None,
        }
    }
}

/// Whether the visible right edge of `strip` reaches `fraction` of its
/// scroll width.
///
/// ```
/// use phased_scroll::{geometry::StripMetrics, px::Px, trigger::nested_scroll::passes_threshold};
///
/// let strip = StripMetrics {
///     scroll_left: Px(0),
///     client_width: Px(400),
///     scroll_width: Px(3520),
/// };
/// assert!(!passes_threshold(&strip, 0.2));
/// ```
pub fn passes_threshold(strip: &StripMetrics, fraction: f32) -> bool {
    let visible_edge = strip.scroll_left.saturating_add(strip.client_width);
    visible_edge.to_f32() >= strip.scroll_width.to_f32() * fraction
}

/// The nested-scroll horizontal trigger.
#[derive(Debug, Clone)]
pub struct NestedScrollTrigger {
    args: NestedScrollArgs,
    active: bool,
    settles: SmallVec<[TimerKey; 4]>,
}

impl NestedScrollTrigger {
    /// Creates an inactive trigger.
    pub fn new(args: NestedScrollArgs) -> Self {
        Self {
            args,
            active: false,
            settles: SmallVec::new(),
        }
    }

    /// Number of wheel-settle timers still pending.
    pub fn pending_settles(&self) -> usize {
        self.settles.len()
    }

    fn decide(&self, ctx: &mut TriggerContext<'_>) {
        if ctx.is_loading() || ctx.sequencer.horizontal_count() >= HORIZONTAL_ITEMS {
            return;
        }
        let strip = match ctx.geometry.strip() {
            Ok(strip) => strip,
            Err(err) => {
                trace!(%err, "nested decision skipped");
                return;
            }
        };
        if passes_threshold(&strip, self.args.threshold_fraction) {
            ctx.request_next();
        }
    }
}

impl HorizontalTrigger for NestedScrollTrigger {
    fn name(&self) -> &'static str {
        "nested-scroll"
    }

    fn activate(&mut self, _ctx: &mut TriggerContext<'_>) {
        self.active = true;
    }

    fn deactivate(&mut self, timers: &mut FeedTimers) {
        self.active = false;
        for key in self.settles.drain(..) {
            timers.cancel(key);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_page_scroll(&mut self, _ctx: &mut TriggerContext<'_>) {}

    fn on_strip_scroll(&mut self, ctx: &mut TriggerContext<'_>) {
        if self.active {
            self.decide(ctx);
        }
    }

    fn on_wheel(&mut self, ctx: &mut TriggerContext<'_>, delta: WheelDelta) -> WheelDisposition {
        if !self.active {
            return WheelDisposition::PassThrough;
        }
        if let Err(err) = ctx.geometry.scroll_strip_by(delta.redirected()) {
            trace!(%err, "wheel not redirected");
            return WheelDisposition::PassThrough;
        }
        let key = ctx.schedule(self.args.wheel_settle, FeedTask::WheelSettle);
        self.settles.push(key);
        WheelDisposition::Consumed
    }

    fn on_timer(&mut self, ctx: &mut TriggerContext<'_>, key: TimerKey) -> bool {
        let Some(index) = self.settles.iter().position(|pending| *pending == key) else {
            return false;
        };
        self.settles.swap_remove(index);
        if self.active {
            self.decide(ctx);
        }
        true
    }

    fn translate(&self) -> Px {
        Px::ZERO
    }

    fn pin_state(&self) -> Option<PinState> {
        None
    }

    fn exit_delay(&self) -> Option<Duration> {
        self.args.exit_delay
    }
}
