//! Horizontal strategy where the section is pinned while the page scrolls
//! through a tall track.
//!
//! Page scroll inside the track maps to a progress ratio, the ratio to an
//! item index, and the index both to a strip translation and to the item
//! count the position justifies. Missing items are backfilled one load at a
//! time.
use std::time::Duration;

use derive_setters::Setters;
use tracing::trace;

use crate::{
    clock::TimerKey,
    geometry::{GeometryError, SectionBounds},
    phase::{HORIZONTAL_END, HORIZONTAL_ITEMS, INITIAL_VERTICAL_END},
    px::Px,
    task::FeedTimers,
    trigger::{HorizontalTrigger, PinState, TriggerContext, WheelDelta, WheelDisposition},
};

const DEFAULT_ITEM_WIDTH: Px = Px(320);
const DEFAULT_ITEM_GAP: Px = Px(32);
const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(500);

/// Configuration of the pinned-translate strategy.
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct PinnedTranslateArgs {
    /// Width of one horizontal card.
    pub item_width: Px,
    /// Gap between horizontal cards.
    pub item_gap: Px,
    /// Auto-advance out of the horizontal phase once its items are loaded.
    pub exit_delay: Option<Duration>,
}

impl Default for PinnedTranslateArgs {
    fn default() -> Self {
        Self {
            item_width: DEFAULT_ITEM_WIDTH,
            item_gap: DEFAULT_ITEM_GAP,
            exit_delay: Some(DEFAULT_EXIT_DELAY),
        }
    }
}

/// Progress of the page scroll through the pin track, in `[0, 1]`.
///
/// Returns `None` when the track is not taller than the viewport.
///
/// ```
/// use phased_scroll::{px::Px, trigger::pinned_translate::scroll_progress};
///
/// let progress = scroll_progress(Px(2320), Px(1000), Px(3200), Px(800));
/// assert_eq!(progress, Some(0.55));
/// ```
pub fn scroll_progress(
    scroll_y: Px,
    track_top: Px,
    track_height: Px,
    viewport_height: Px,
) -> Option<f32> {
    let range = track_height.saturating_sub(viewport_height);
    if range <= Px::ZERO {
        return None;
    }
    let travelled = scroll_y.saturating_sub(track_top);
    Some((travelled.to_f32() / range.to_f32()).clamp(0.0, 1.0))
}

/// Horizontal item index implied by `progress`. A progress of 1.0 yields
/// [`HORIZONTAL_ITEMS`], one past the last card.
pub fn target_index(progress: f32) -> usize {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    (progress * HORIZONTAL_ITEMS as f32).floor() as usize
}

/// Leftward strip translation that centers card `index` in a strip of
/// `strip_width`. Indices past the last card center the last card.
///
/// ```
/// use phased_scroll::{px::Px, trigger::pinned_translate::centered_translation};
///
/// assert_eq!(centered_translation(5, Px(320), Px(32), Px(1000)), Px(1420));
/// assert_eq!(centered_translation(0, Px(320), Px(32), Px(1000)), Px(0));
/// ```
pub fn centered_translation(index: usize, item_width: Px, gap: Px, strip_width: Px) -> Px {
    let index = index.min(HORIZONTAL_ITEMS - 1);
    let stride = item_width.saturating_add(gap);
    stride
        .saturating_mul_count(index)
        .saturating_add(item_width / 2)
        .saturating_sub(strip_width / 2)
        .positive()
}

/// Where `scroll_y` sits relative to `track`.
pub fn pin_state_at(scroll_y: Px, track: &SectionBounds, viewport_height: Px) -> PinState {
    let pin_end = track
        .bottom()
        .saturating_sub(viewport_height)
        .max(track.top);
    if scroll_y < track.top {
        PinState::Before
    } else if scroll_y > pin_end {
        PinState::After
    } else {
        PinState::Pinned
    }
}

/// Item count the horizontal index justifies.
pub fn target_count(index: usize) -> usize {
    INITIAL_VERTICAL_END + 1 + index
}

/// The pinned-translate horizontal trigger.
#[derive(Debug, Clone)]
pub struct PinnedTranslateTrigger {
    args: PinnedTranslateArgs,
    active: bool,
    progress: Option<f32>,
    pin: Option<PinState>,
    translate: Px,
}

impl PinnedTranslateTrigger {
    /// Creates an inactive trigger.
    pub fn new(args: PinnedTranslateArgs) -> Self {
        Self {
            args,
            active: false,
            progress: None,
            pin: None,
            translate: Px::ZERO,
        }
    }

    /// Last computed scroll progress, while active.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    fn sync(&mut self, ctx: &mut TriggerContext<'_>) {
        let page = match ctx.geometry.page() {
            Ok(page) => page,
            Err(err) => {
                trace!(%err, "pinned sync skipped");
                return;
            }
        };
        let track = match ctx.geometry.horizontal_section() {
            Ok(track) => track,
            Err(err) => {
                trace!(%err, "pinned sync skipped");
                return;
            }
        };

        self.pin = Some(pin_state_at(page.scroll_top, &track, page.viewport_height));
        let Some(progress) = scroll_progress(
            page.scroll_top,
            track.top,
            track.height,
            page.viewport_height,
        ) else {
            let err = GeometryError::Degenerate {
                what: "pin track",
                detail: format!(
                    "height {} does not exceed viewport {}",
                    track.height.raw(),
                    page.viewport_height.raw()
                ),
            };
            trace!(%err, "pinned sync skipped");
            return;
        };
        self.progress = Some(progress);

        let index = target_index(progress);
        match ctx.geometry.strip() {
            Ok(strip) => {
                self.translate = centered_translation(
                    index,
                    self.args.item_width,
                    self.args.item_gap,
                    strip.client_width,
                );
            }
            Err(err) => trace!(%err, "translation not updated"),
        }

        let target = target_count(index);
        if target > ctx.count() && target <= HORIZONTAL_END && !ctx.is_loading() {
            trace!(progress, index, target, "backfilling");
            ctx.request_next();
        }
    }
}

impl HorizontalTrigger for PinnedTranslateTrigger {
    fn name(&self) -> &'static str {
        "pinned-translate"
    }

    fn activate(&mut self, ctx: &mut TriggerContext<'_>) {
        self.active = true;
        self.sync(ctx);
    }

    fn deactivate(&mut self, _timers: &mut FeedTimers) {
        self.active = false;
        self.progress = None;
        self.pin = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_page_scroll(&mut self, ctx: &mut TriggerContext<'_>) {
        if self.active {
            self.sync(ctx);
        }
    }

    fn on_strip_scroll(&mut self, _ctx: &mut TriggerContext<'_>) {}

    fn on_wheel(&mut self, _ctx: &mut TriggerContext<'_>, _delta: WheelDelta) -> WheelDisposition {
        WheelDisposition::PassThrough
    }

    fn on_timer(&mut self, _ctx: &mut TriggerContext<'_>, _key: TimerKey) -> bool {
        false
    }

    fn translate(&self) -> Px {
        self.translate
    }

    fn pin_state(&self) -> Option<PinState> {
        self.pin
    }

    fn exit_delay(&self) -> Option<Duration> {
        self.args.exit_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::testing::FixedGeometry, phase::Phase, sequencer::ItemSequencer};

    const LOAD: Duration = Duration::from_millis(500);
    const TRACK_TOP: i32 = 1000;
    const TRACK_HEIGHT: i32 = 3200;
    const VIEWPORT: i32 = 800;

    struct Rig {
        trigger: PinnedTranslateTrigger,
        sequencer: ItemSequencer,
        timers: FeedTimers,
        geometry: FixedGeometry,
        now: Duration,
    }

    macro_rules! ctx {
        ($rig:expr) => {
            &mut TriggerContext {
                now: $rig.now,
                phase: Phase::Horizontal,
                sequencer: &mut $rig.sequencer,
                timers: &mut $rig.timers,
                geometry: &mut $rig.geometry,
            }
        };
    }

    impl Rig {
        fn with_count(count: usize, scroll_y: i32) -> Self {
            let geometry = FixedGeometry::with_page(scroll_y, VIEWPORT, 8000)
                .with_section(TRACK_TOP, TRACK_HEIGHT)
                .with_strip(0, 1000, 3520);
            let mut rig = Self {
                trigger: PinnedTranslateTrigger::new(PinnedTranslateArgs::default()),
                sequencer: ItemSequencer::new(LOAD),
                timers: FeedTimers::new(),
                geometry,
                now: Duration::ZERO,
            };
            while rig.sequencer.count() < count {
                rig.sequencer.request_next(&mut rig.timers, rig.now);
                rig.complete();
            }
            rig
        }

        fn complete(&mut self) {
            self.now += LOAD;
            let (key, _) = self.timers.pop_due(self.now).expect("load scheduled");
            self.sequencer.complete_load(key);
        }

        fn scroll_to(&mut self, scroll_y: i32) {
            self.geometry.set_scroll_top(scroll_y);
            self.trigger.on_page_scroll(ctx!(self));
        }
    }

    /// Scroll offset that yields `progress` through the test track.
    fn scroll_for(progress: f32) -> i32 {
        TRACK_TOP + ((TRACK_HEIGHT - VIEWPORT) as f32 * progress) as i32
    }

    #[test]
    fn test_progress_is_clamped() {
        let progress = |y| scroll_progress(Px(y), Px(1000), Px(3200), Px(800));
        assert_eq!(progress(0), Some(0.0));
        assert_eq!(progress(1000), Some(0.0));
        assert_eq!(progress(3400), Some(1.0));
        assert_eq!(progress(9000), Some(1.0));
        assert_eq!(scroll_progress(Px(0), Px(0), Px(800), Px(800)), None);
    }

    #[test]
    fn test_target_index_and_count() {
        assert_eq!(target_index(0.55), 5);
        assert_eq!(target_count(target_index(0.55)), 26);
        assert_eq!(target_index(0.0), 0);
        assert_eq!(target_index(0.999), 9);
        assert_eq!(target_index(1.0), 10);
        assert_eq!(target_count(10), 31);
        assert_eq!(target_index(f32::NAN), 0);
    }

    #[test]
    fn test_translation_centers_card_and_never_goes_negative() {
        assert_eq!(centered_translation(1, Px(320), Px(32), Px(1000)), Px(12));
        assert_eq!(centered_translation(9, Px(320), Px(32), Px(1000)), Px(2828));
        assert_eq!(centered_translation(10, Px(320), Px(32), Px(1000)), Px(2828));
        assert_eq!(centered_translation(0, Px(320), Px(32), Px(400)), Px(0));
    }

    #[test]
    fn test_pin_state_regions() {
        let track = SectionBounds {
            top: Px(1000),
            height: Px(3200),
        };
        assert_eq!(pin_state_at(Px(999), &track, Px(800)), PinState::Before);
        assert_eq!(pin_state_at(Px(1000), &track, Px(800)), PinState::Pinned);
        assert_eq!(pin_state_at(Px(3400), &track, Px(800)), PinState::Pinned);
        assert_eq!(pin_state_at(Px(3401), &track, Px(800)), PinState::After);
    }

    #[test]
    fn test_progress_055_with_25_items_requests_once() {
        let mut rig = Rig::with_count(25, TRACK_TOP);
        rig.trigger.activate(ctx!(rig));
        assert_eq!(rig.sequencer.stats().accepted, 25);

        for _ in 0..5 {
            rig.scroll_to(scroll_for(0.55));
        }
        assert_eq!(rig.trigger.progress(), Some(0.55));
        assert_eq!(rig.sequencer.stats().accepted, 26);
        assert_eq!(rig.sequencer.stats().ignored_loading, 0);

        rig.complete();
        assert_eq!(rig.sequencer.count(), 26);
        rig.scroll_to(scroll_for(0.55));
        assert_eq!(rig.sequencer.stats().accepted, 26, "position already satisfied");
    }

    #[test]
    fn test_backfill_walks_one_item_per_load() {
        let mut rig = Rig::with_count(21, TRACK_TOP);
        rig.trigger.activate(ctx!(rig));
        rig.scroll_to(scroll_for(0.95));

        let mut loaded = Vec::new();
        while rig.sequencer.is_loading() {
            rig.complete();
            loaded.push(rig.sequencer.count());
            rig.scroll_to(scroll_for(0.95));
        }
        assert_eq!(loaded, (22..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_end_of_track_never_requests_past_horizontal_section() {
        let mut rig = Rig::with_count(30, TRACK_TOP);
        rig.trigger.activate(ctx!(rig));
        rig.scroll_to(TRACK_TOP + TRACK_HEIGHT);
        assert!(!rig.sequencer.is_loading());
        assert_eq!(rig.trigger.pin_state(), Some(PinState::After));
        assert_eq!(rig.trigger.translate(), Px(2828));
    }

    #[test]
    fn test_activate_syncs_current_position() {
        let mut rig = Rig::with_count(21, scroll_for(0.35));
        rig.trigger.activate(ctx!(rig));
        assert!(rig.sequencer.is_loading());
        assert_eq!(rig.trigger.translate(), Px(716));
        assert_eq!(rig.trigger.pin_state(), Some(PinState::Pinned));
    }

    #[test]
    fn test_missing_strip_still_backfills() {
        let mut rig = Rig::with_count(21, TRACK_TOP);
        rig.geometry.strip = None;
        rig.trigger.activate(ctx!(rig));
        rig.scroll_to(scroll_for(0.25));
        assert!(rig.sequencer.is_loading());
        assert_eq!(rig.trigger.translate(), Px::ZERO);
    }

    #[test]
    fn test_short_track_is_skipped() {
        let mut rig = Rig::with_count(21, TRACK_TOP);
        rig.geometry.section = Some(SectionBounds {
            top: Px(TRACK_TOP),
            height: Px(VIEWPORT),
        });
        rig.trigger.activate(ctx!(rig));
        rig.scroll_to(TRACK_TOP + 400);
        assert!(!rig.sequencer.is_loading());
        assert_eq!(rig.trigger.progress(), None);
    }

    #[test]
    fn test_deactivate_drops_progress_keeps_translation() {
        let mut rig = Rig::with_count(21, scroll_for(0.35));
        rig.trigger.activate(ctx!(rig));
        rig.trigger.deactivate(&mut rig.timers);
        assert!(!rig.trigger.is_active());
        assert_eq!(rig.trigger.progress(), None);
        assert_eq!(rig.trigger.pin_state(), None);
        assert_eq!(rig.trigger.translate(), Px(716));

        let accepted = rig.sequencer.stats().accepted;
        rig.complete();
        rig.scroll_to(scroll_for(0.9));
        assert_eq!(rig.sequencer.stats().accepted, accepted);
    }
}
