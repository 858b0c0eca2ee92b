//! The item sequencer: the only writer of the item list and the loading flag.
use std::{fmt, time::Duration};

use tracing::{debug, trace};

use crate::{
    clock::{TimerKey, TimerSource},
    phase::{HORIZONTAL_END, INITIAL_VERTICAL_END, MAX_ITEMS},
    task::FeedTask,
};

/// Identifier of a loaded item. Identifiers start at 1 and are assigned in
/// strictly increasing, gap-free order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u32);

impl ItemId {
    /// The raw identifier.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters describing how `request_next` calls were resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerStats {
    /// Calls that started a load.
    pub accepted: u64,
    /// Calls ignored because a load was already in flight.
    pub ignored_loading: u64,
    /// Calls ignored because every item is already loaded.
    pub ignored_exhausted: u64,
}

/// Result of a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// The appended item.
    pub item: ItemId,
    /// Item count after the append.
    pub count: usize,
    /// Whether the append reached [`MAX_ITEMS`].
    pub reached_max: bool,
}

/// Owns the monotonically growing item list and the single in-flight load.
#[derive(Debug, Clone)]
pub struct ItemSequencer {
    items: Vec<ItemId>,
    in_flight: Option<TimerKey>,
    load_delay: Duration,
    stats: SequencerStats,
}

impl ItemSequencer {
    /// Creates an empty sequencer whose loads resolve after `load_delay`.
    pub fn new(load_delay: Duration) -> Self {
        Self {
            items: Vec::with_capacity(MAX_ITEMS),
            in_flight: None,
            load_delay,
            stats: SequencerStats::default(),
        }
    }

    /// Requests the next item.
    ///
    /// Does nothing while a load is in flight or once every item is loaded.
    /// Otherwise raises the loading flag and schedules the completion
    /// `load_delay` after `now`.
    pub fn request_next(&mut self, timers: &mut impl TimerSource<FeedTask>, now: Duration) {
        if self.in_flight.is_some() {
            self.stats.ignored_loading += 1;
            trace!(count = self.items.len(), "request ignored: load in flight");
            return;
        }
        if self.items.len() >= MAX_ITEMS {
            self.stats.ignored_exhausted += 1;
            trace!("request ignored: all items loaded");
            return;
        }

        let deadline = now.saturating_add(self.load_delay);
        self.in_flight = Some(timers.schedule(deadline, FeedTask::CompleteLoad));
        self.stats.accepted += 1;
        debug!(
            next = self.items.len() + 1,
            ?deadline,
            "load started"
        );
    }

    /// Resolves the in-flight load identified by `key`.
    ///
    /// Returns `None` for a key that is not the in-flight load.
    pub fn complete_load(&mut self, key: TimerKey) -> Option<LoadOutcome> {
        if self.in_flight != Some(key) {
            return None;
        }
        self.in_flight = None;

        if self.items.len() >= MAX_ITEMS {
            return None;
        }
        let item = ItemId(self.items.len() as u32 + 1);
        self.items.push(item);
        let count = self.items.len();
        debug!(%item, count, "item loaded");

        Some(LoadOutcome {
            item,
            count,
            reached_max: count == MAX_ITEMS,
        })
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of loaded items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether every item is loaded.
    pub fn is_exhausted(&self) -> bool {
        self.items.len() >= MAX_ITEMS
    }

    /// All loaded items in creation order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Items of the initial vertical section (ids 1 to 20).
    pub fn initial_items(&self) -> &[ItemId] {
        self.range(0, INITIAL_VERTICAL_END)
    }

    /// Items of the horizontal section (ids 21 to 30).
    pub fn horizontal_items(&self) -> &[ItemId] {
        self.range(INITIAL_VERTICAL_END, HORIZONTAL_END)
    }

    /// Items of the final vertical section (ids 31 to 50).
    pub fn final_items(&self) -> &[ItemId] {
        self.range(HORIZONTAL_END, MAX_ITEMS)
    }

    /// Number of loaded items in the horizontal section.
    pub fn horizontal_count(&self) -> usize {
        self.horizontal_items().len()
    }

    /// Resolution counters.
    pub fn stats(&self) -> SequencerStats {
        self.stats
    }

    fn range(&self, start: usize, end: usize) -> &[ItemId] {
        let len = self.items.len();
        &self.items[start.min(len)..end.min(len)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::FeedTimers;

    const DELAY: Duration = Duration::from_millis(500);

    fn resolve_next(
        sequencer: &mut ItemSequencer,
        timers: &mut FeedTimers,
        now: Duration,
    ) -> Option<LoadOutcome> {
        let (key, task) = timers.pop_due(now)?;
        assert_eq!(task, FeedTask::CompleteLoad);
        sequencer.complete_load(key)
    }

    #[test]
    fn test_request_sets_loading_until_delay_elapses() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);

        sequencer.request_next(&mut timers, Duration::ZERO);
        assert!(sequencer.is_loading());
        assert_eq!(sequencer.count(), 0);
        assert!(timers.pop_due(DELAY - Duration::from_millis(1)).is_none());

        let outcome = resolve_next(&mut sequencer, &mut timers, DELAY).expect("load resolves");
        assert_eq!(outcome.item, ItemId(1));
        assert_eq!(outcome.count, 1);
        assert!(!outcome.reached_max);
        assert!(!sequencer.is_loading());
    }

    #[test]
    fn test_requests_while_loading_are_ignored() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);

        for tick in 0..5u64 {
            sequencer.request_next(&mut timers, Duration::from_millis(tick * 10));
        }
        assert_eq!(timers.len(), 1);
        assert_eq!(sequencer.stats().accepted, 1);
        assert_eq!(sequencer.stats().ignored_loading, 4);

        resolve_next(&mut sequencer, &mut timers, Duration::from_secs(1));
        assert_eq!(sequencer.items(), &[ItemId(1)]);
    }

    #[test]
    fn test_ids_are_gap_free_and_capped() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);
        let mut now = Duration::ZERO;

        for _ in 0..(MAX_ITEMS + 5) {
            let before = sequencer.count();
            sequencer.request_next(&mut timers, now);
            now += DELAY;
            resolve_next(&mut sequencer, &mut timers, now);
            assert!(sequencer.count() >= before);
            assert!(sequencer.count() <= MAX_ITEMS);
        }

        let expected: Vec<_> = (1..=MAX_ITEMS as u32).map(ItemId).collect();
        assert_eq!(sequencer.items(), expected.as_slice());
        assert!(sequencer.is_exhausted());
        assert_eq!(sequencer.stats().ignored_exhausted, 5);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_last_load_reports_reached_max() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);
        let mut last = None;
        let mut now = Duration::ZERO;
        while !sequencer.is_exhausted() {
            sequencer.request_next(&mut timers, now);
            now += DELAY;
            last = resolve_next(&mut sequencer, &mut timers, now);
        }
        assert_eq!(
            last,
            Some(LoadOutcome {
                item: ItemId(50),
                count: 50,
                reached_max: true,
            })
        );
    }

    #[test]
    fn test_stale_key_does_not_append() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);
        let stray = timers.schedule(Duration::ZERO, FeedTask::CompleteLoad);

        sequencer.request_next(&mut timers, Duration::ZERO);
        assert!(sequencer.complete_load(stray).is_none());
        assert!(sequencer.is_loading());
        assert_eq!(sequencer.count(), 0);
    }

    #[test]
    fn test_section_views() {
        let mut timers = FeedTimers::new();
        let mut sequencer = ItemSequencer::new(DELAY);
        let mut now = Duration::ZERO;
        for _ in 0..33 {
            sequencer.request_next(&mut timers, now);
            now += DELAY;
            resolve_next(&mut sequencer, &mut timers, now);
        }

        assert_eq!(sequencer.initial_items().len(), 20);
        assert_eq!(sequencer.horizontal_items().first(), Some(&ItemId(21)));
        assert_eq!(sequencer.horizontal_count(), 10);
        assert_eq!(sequencer.final_items(), &[ItemId(31), ItemId(32), ItemId(33)]);
    }
}
