//! A scripted user that scrolls steadily towards the end of the feed.
use std::time::Duration;

use phased_scroll::{FeedController, WheelDelta, WheelDisposition, px::Px};

use crate::page::{SectionLayout, SimulatedPage};

/// What the user did during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Scrolled the page.
    Scrolled,
    /// Wheeled over the strip and the feed consumed it.
    Wheeled,
    /// Waited for a card to load.
    Waiting,
    /// Nothing moved.
    Idle,
}

#[derive(Debug, Clone)]
pub struct ScriptedUser {
    speed: Px,
}

impl ScriptedUser {
    pub fn new(speed: Px) -> Self {
        Self { speed }
    }

    /// Acts once.
    ///
    /// In the horizontal phase a nested strip receives wheel input, and a
    /// pinned track is only scrolled while no card is loading, the way a
    /// reader pauses on a spinner. Everywhere else the page scrolls, and a
    /// scroll that does not move the page emits no event.
    pub fn step(&mut self, feed: &mut FeedController<SimulatedPage>, now: Duration) -> Action {
        let phase = feed.phase();
        if phase.is_terminal() {
            return Action::Idle;
        }

        if phase.is_horizontal() {
            match feed.geometry().layout() {
                SectionLayout::Nested => {
                    let delta = WheelDelta::new(0.0, self.speed.to_f32());
                    if feed.on_wheel(now, delta) == WheelDisposition::Consumed {
                        return Action::Wheeled;
                    }
                }
                SectionLayout::Pinned if feed.is_loading() => return Action::Waiting,
                SectionLayout::Pinned => {}
            }
        }

        if feed.geometry_mut().scroll_page_by(self.speed) {
            feed.on_page_scroll(now);
            Action::Scrolled
        } else {
            Action::Idle
        }
    }
}
