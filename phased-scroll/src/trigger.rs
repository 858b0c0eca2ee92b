//! Triggers decide when user input justifies the next item.
//!
//! The vertical trigger owns both vertical phases. The horizontal phase is
//! owned by one of two interchangeable strategies behind
//! [`HorizontalTrigger`], chosen once through [`HorizontalStrategy`].
pub mod nested_scroll;
pub mod pinned_translate;
pub mod vertical;

use std::{fmt, time::Duration};

use crate::{
    clock::{TimerKey, TimerSource},
    geometry::ViewportGeometry,
    phase::Phase,
    px::Px,
    sequencer::ItemSequencer,
    task::{FeedTask, FeedTimers},
};

pub use nested_scroll::{NestedScrollArgs, NestedScrollTrigger};
pub use pinned_translate::{PinnedTranslateArgs, PinnedTranslateTrigger};
pub use vertical::VerticalTrigger;

/// Everything a trigger may read or drive while handling one event.
///
/// Triggers read the sequencer freely but only ever mutate it through
/// [`request_next`](Self::request_next).
pub struct TriggerContext<'a> {
    /// Time of the event being handled.
    pub now: Duration,
    /// Phase at the time of the event.
    pub phase: Phase,
    /// The item sequencer.
    pub sequencer: &'a mut ItemSequencer,
    /// The shared timer queue.
    pub timers: &'a mut FeedTimers,
    /// The injected geometry provider.
    pub geometry: &'a mut dyn ViewportGeometry,
}

impl TriggerContext<'_> {
    /// Asks the sequencer for the next item.
    pub fn request_next(&mut self) {
        self.sequencer.request_next(&mut *self.timers, self.now);
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    /// Number of loaded items.
    pub fn count(&self) -> usize {
        self.sequencer.count()
    }

    /// Arms a one-shot timer `delay` after now.
    pub fn schedule(&mut self, delay: Duration, task: FeedTask) -> TimerKey {
        self.timers.schedule(self.now.saturating_add(delay), task)
    }
}

/// A wheel event captured over the strip, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Horizontal delta.
    pub delta_x: f32,
    /// Vertical delta.
    pub delta_y: f32,
}

impl WheelDelta {
    /// Creates a delta.
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self { delta_x, delta_y }
    }

    /// The delta to apply horizontally: the vertical component when it is
    /// non-zero, otherwise the horizontal one. Non-finite values count as
    /// zero.
    pub fn redirected(self) -> Px {
        let pick = |value: f32| (value.is_finite() && value != 0.0).then_some(value);
        let delta = pick(self.delta_y).or_else(|| pick(self.delta_x)).unwrap_or(0.0);
        Px::saturating_from_f32(delta.round())
    }
}

/// What the host must do with a wheel event after the feed saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    /// The feed redirected the event; suppress the page's default scroll.
    Consumed,
    /// The feed ignored the event; let the page scroll normally.
    PassThrough,
}

/// Where the page scroll sits relative to the pin track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    /// The track has not reached the top of the viewport yet.
    Before,
    /// The section is pinned; page scroll drives the strip translation.
    Pinned,
    /// The page has scrolled past the end of the track.
    After,
}

/// Selects the horizontal-phase strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum HorizontalStrategy {
    /// The strip scrolls inside its own container.
    NestedScroll(NestedScrollArgs),
    /// The section is pinned while the page scrolls through a tall track.
    PinnedTranslate(PinnedTranslateArgs),
}

impl Default for HorizontalStrategy {
    fn default() -> Self {
        Self::PinnedTranslate(PinnedTranslateArgs::default())
    }
}

impl HorizontalStrategy {
    /// Builds the trigger for this strategy.
    pub fn build(&self) -> Box<dyn HorizontalTrigger> {
        match self {
            Self::NestedScroll(args) => Box::new(NestedScrollTrigger::new(args.clone())),
            Self::PinnedTranslate(args) => Box::new(PinnedTranslateTrigger::new(args.clone())),
        }
    }
}

/// Contract shared by the horizontal-phase strategies.
///
/// The controller activates the trigger when the phase becomes
/// [`Phase::Horizontal`] and deactivates it as soon as the phase moves on.
/// An inactive trigger ignores every event.
pub trait HorizontalTrigger: fmt::Debug + Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Starts listening.
    fn activate(&mut self, ctx: &mut TriggerContext<'_>);

    /// Stops listening, cancels every timer it armed and drops transient
    /// scroll progress.
    fn deactivate(&mut self, timers: &mut FeedTimers);

    /// Whether the trigger is listening.
    fn is_active(&self) -> bool;

    /// A page scroll (or resize) sample.
    fn on_page_scroll(&mut self, ctx: &mut TriggerContext<'_>);

    /// A native scroll of the strip container.
    fn on_strip_scroll(&mut self, ctx: &mut TriggerContext<'_>);

    /// A wheel event over the strip.
    fn on_wheel(&mut self, ctx: &mut TriggerContext<'_>, delta: WheelDelta) -> WheelDisposition;

    /// A timer fired. Returns `true` if the key belonged to this trigger.
    fn on_timer(&mut self, ctx: &mut TriggerContext<'_>, key: TimerKey) -> bool;

    /// Translation the renderer applies to the strip, as a leftward shift.
    fn translate(&self) -> Px;

    /// Pin state, for strategies that pin.
    fn pin_state(&self) -> Option<PinState>;

    /// Delay of the auto-advance out of the horizontal phase once all of its
    /// items are loaded, if the strategy uses one.
    fn exit_delay(&self) -> Option<Duration>;
}
