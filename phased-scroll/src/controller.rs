//! The feed controller wires the sequencer, the phase classifier, the
//! triggers and the boundary auto-advance together.
//!
//! The host forwards raw input and the current time; the controller fires due
//! timers, republishes the phase after every append and notifies subscribers
//! whenever something the renderer shows has changed.
use std::{fmt, sync::Arc, time::Duration};

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, trace, warn};

use crate::{
    auto_advance::BoundaryAutoAdvance,
    clock::TimerKey,
    config::FeedArgs,
    geometry::ViewportGeometry,
    phase::{Phase, classify},
    px::Px,
    sequencer::{ItemId, ItemSequencer, LoadOutcome, SequencerStats},
    task::{FeedTask, FeedTimers},
    trigger::{
        HorizontalTrigger, PinState, TriggerContext, VerticalTrigger, WheelDelta,
        WheelDisposition,
    },
};

new_key_type! {
    /// Handle of a registered snapshot listener.
    pub struct SubscriptionKey;
}

type Listener = Box<dyn FnMut(&FeedSnapshot) + Send + Sync>;

/// Everything the renderer needs to draw the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Loaded items in creation order.
    pub item_ids: Vec<ItemId>,
    /// Current phase.
    pub phase: Phase,
    /// Whether a load is in flight.
    pub is_loading: bool,
    /// Leftward translation of the horizontal strip.
    pub horizontal_translate: Px,
    /// Pin state of the horizontal section, for strategies that pin.
    pub pin_state: Option<PinState>,
}

/// The subset of state whose change is worth a notification.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observed {
    count: usize,
    phase: Phase,
    is_loading: bool,
    translate: Px,
    pin_state: Option<PinState>,
}

/// Borrows the controller's parts as a [`TriggerContext`], leaving the
/// triggers free to be borrowed alongside it.
macro_rules! context {
    ($feed:expr) => {
        &mut TriggerContext {
            now: $feed.now,
            phase: $feed.phase,
            sequencer: &mut $feed.sequencer,
            timers: &mut $feed.timers,
            geometry: &mut $feed.geometry,
        }
    };
}

/// Phased progressive-loading scroll controller.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use phased_scroll::{config::FeedArgs, controller::FeedController, sequencer::ItemId};
/// # use phased_scroll::{geometry::*, px::Px};
/// # struct Unmounted;
/// # impl ViewportGeometry for Unmounted {
/// #     fn page(&self) -> Result<PageMetrics, GeometryError> { Err(GeometryError::NotMounted("page")) }
/// #     fn horizontal_section(&self) -> Result<SectionBounds, GeometryError> { Err(GeometryError::NotMounted("section")) }
/// #     fn strip(&self) -> Result<StripMetrics, GeometryError> { Err(GeometryError::NotMounted("strip")) }
/// #     fn scroll_strip_by(&mut self, _: Px) -> Result<(), GeometryError> { Err(GeometryError::NotMounted("strip")) }
/// # }
///
/// let mut feed = FeedController::new(FeedArgs::default(), Unmounted);
/// feed.mount(Duration::ZERO);
/// assert!(feed.is_loading());
///
/// feed.advance_to(Duration::from_millis(500));
/// assert_eq!(feed.items(), &[ItemId(1)]);
/// ```
pub struct FeedController<G> {
    sequencer: ItemSequencer,
    timers: FeedTimers,
    phase: Phase,
    vertical: VerticalTrigger,
    horizontal: Box<dyn HorizontalTrigger>,
    auto_advance: BoundaryAutoAdvance,
    geometry: G,
    subscribers: SlotMap<SubscriptionKey, Listener>,
    last_observed: Option<Observed>,
    now: Duration,
}

impl<G: ViewportGeometry> FeedController<G> {
    /// Creates an unmounted feed with no items.
    pub fn new(args: FeedArgs, geometry: G) -> Self {
        let mut vertical = VerticalTrigger::new(args.vertical_debounce, args.bottom_threshold);
        let phase = classify(0);
        if phase.is_vertical() {
            vertical.activate();
        }
        let horizontal = args.horizontal.build();
        debug!(strategy = horizontal.name(), "feed created");

        Self {
            sequencer: ItemSequencer::new(args.load_delay),
            timers: FeedTimers::new(),
            phase,
            vertical,
            horizontal,
            auto_advance: BoundaryAutoAdvance::new(args.enter_horizontal_delay),
            geometry,
            subscribers: SlotMap::with_key(),
            last_observed: None,
            now: Duration::ZERO,
        }
    }

    /// Mounts the feed. An empty feed immediately requests its first item.
    /// Mounting again has no effect.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn mount(&mut self, now: Duration) {
        self.advance_timers(now);
        self.auto_advance.on_mount(context!(self));
        self.publish();
    }

    /// A page scroll sample.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_page_scroll(&mut self, now: Duration) {
        self.advance_timers(now);
        self.vertical.on_page_scroll(context!(self));
        self.horizontal.on_page_scroll(context!(self));
        self.publish();
    }

    /// A viewport resize. Treated as a page scroll sample.
    pub fn on_resize(&mut self, now: Duration) {
        self.on_page_scroll(now);
    }

    /// A native scroll of the horizontal strip's container.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_strip_scroll(&mut self, now: Duration) {
        self.advance_timers(now);
        self.horizontal.on_strip_scroll(context!(self));
        self.publish();
    }

    /// A wheel event over the horizontal strip. The host must suppress the
    /// page's default scroll when the result is
    /// [`WheelDisposition::Consumed`].
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_wheel(&mut self, now: Duration, delta: WheelDelta) -> WheelDisposition {
        self.advance_timers(now);
        let disposition = self.horizontal.on_wheel(context!(self), delta);
        self.publish();
        disposition
    }

    /// Fires every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) {
        self.advance_timers(now);
        self.publish();
    }

    /// Fires every pending timer regardless of deadline and returns the time
    /// the feed settled at.
    pub fn run_until_idle(&mut self) -> Duration {
        while let Some(deadline) = self.timers.next_deadline() {
            self.advance_to(deadline);
        }
        self.now
    }

    /// Deadline of the earliest pending timer. Hosts without a frame loop can
    /// sleep until then.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn advance_timers(&mut self, now: Duration) {
        let now = if now < self.now {
            warn!(?now, last = ?self.now, "time ran backwards; clamped");
            self.now
        } else {
            now
        };

        while let Some(deadline) = self.timers.next_deadline().filter(|at| *at <= now) {
            self.now = deadline;
            let Some((key, task)) = self.timers.pop_due(deadline) else {
                break;
            };
            self.dispatch(key, task);
        }
        self.now = now;
    }

    fn dispatch(&mut self, key: TimerKey, task: FeedTask) {
        let claimed = match task {
            FeedTask::CompleteLoad => match self.sequencer.complete_load(key) {
                Some(outcome) => {
                    self.on_loaded(outcome);
                    true
                }
                None => false,
            },
            FeedTask::VerticalCheck => self.vertical.on_timer(context!(self), key),
            FeedTask::WheelSettle => self.horizontal.on_timer(context!(self), key),
            FeedTask::Boundary { expected_count, .. } => {
                self.auto_advance
                    .on_timer(context!(self), key, expected_count)
            }
        };
        if !claimed {
            trace!(?task, "stale timer ignored");
        }
    }

    fn on_loaded(&mut self, outcome: LoadOutcome) {
        let next = if outcome.reached_max {
            Phase::Complete
        } else {
            classify(outcome.count)
        };

        if next != self.phase {
            self.transition(next);
        } else if self.phase.is_horizontal() {
            // The position that justified this item may justify the next one.
            self.horizontal.on_page_scroll(context!(self));
        }

        let exit_delay = self.horizontal.exit_delay();
        self.auto_advance
            .on_count_changed(context!(self), exit_delay);
    }

    fn transition(&mut self, next: Phase) {
        let previous = self.phase;
        debug!(from = %previous, to = %next, count = self.sequencer.count(), "phase changed");

        if previous.is_vertical() && !next.is_vertical() {
            self.vertical.deactivate(&mut self.timers);
        }
        if previous.is_horizontal() {
            self.horizontal.deactivate(&mut self.timers);
        }

        self.phase = next;

        if next.is_vertical() && !self.vertical.is_active() {
            self.vertical.activate();
        }
        if next.is_horizontal() {
            self.horizontal.activate(context!(self));
        }
    }

    /// Registers a listener called with a fresh snapshot after every
    /// observable change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&FeedSnapshot) + Send + Sync + 'static,
    ) -> SubscriptionKey {
        self.subscribers.insert(Box::new(listener))
    }

    /// Removes a listener. Returns `false` for an unknown key.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.remove(key).is_some()
    }

    fn observe(&self) -> Observed {
        Observed {
            count: self.sequencer.count(),
            phase: self.phase,
            is_loading: self.sequencer.is_loading(),
            translate: self.horizontal.translate(),
            pin_state: self.horizontal.pin_state(),
        }
    }

    fn publish(&mut self) {
        let observed = self.observe();
        if self.last_observed == Some(observed) {
            return;
        }
        self.last_observed = Some(observed);
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in self.subscribers.values_mut() {
            listener(&snapshot);
        }
    }

    /// Current renderer-facing state.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            item_ids: self.sequencer.items().to_vec(),
            phase: self.phase,
            is_loading: self.sequencer.is_loading(),
            horizontal_translate: self.horizontal.translate(),
            pin_state: self.horizontal.pin_state(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of loaded items.
    pub fn item_count(&self) -> usize {
        self.sequencer.count()
    }

    /// Loaded items in creation order.
    pub fn items(&self) -> &[ItemId] {
        self.sequencer.items()
    }

    /// The item sequencer, for section views.
    pub fn sequencer(&self) -> &ItemSequencer {
        &self.sequencer
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.sequencer.is_loading()
    }

    /// Leftward translation of the horizontal strip.
    pub fn horizontal_translate(&self) -> Px {
        self.horizontal.translate()
    }

    /// Name of the horizontal strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.horizontal.name()
    }

    /// Load request counters.
    pub fn stats(&self) -> SequencerStats {
        self.sequencer.stats()
    }

    /// Latest time the controller has seen.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The geometry provider.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable access to the geometry provider, for hosts that own their
    /// layout through it.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }
}

impl<G: fmt::Debug> fmt::Debug for FeedController<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedController")
            .field("phase", &self.phase)
            .field("sequencer", &self.sequencer)
            .field("horizontal", &self.horizontal)
            .field("pending_timers", &self.timers.len())
            .field("subscribers", &self.subscribers.len())
            .field("geometry", &self.geometry)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`FeedController`].
///
/// Cloning the handle shares the controller, so several event callbacks can
/// drive the same feed.
pub struct FeedHandle<G> {
    inner: Arc<RwLock<FeedController<G>>>,
}

impl<G> Clone for FeedHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: ViewportGeometry> FeedHandle<G> {
    /// Wraps a controller.
    pub fn new(controller: FeedController<G>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(controller)),
        }
    }

    /// Execute a closure with a shared reference to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&FeedController<G>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Execute a closure with a mutable reference to the controller.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut FeedController<G>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Current renderer-facing state.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.with(FeedController::snapshot)
    }
}

impl<G> fmt::Debug for FeedHandle<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedHandle")
            .field("strong", &Arc::strong_count(&self.inner))
            .finish()
    }
}
