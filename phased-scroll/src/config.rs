//! Feed configuration.
use std::time::Duration;

use derive_setters::Setters;

use crate::{px::Px, trigger::HorizontalStrategy};

pub use crate::trigger::{NestedScrollArgs, PinnedTranslateArgs};

const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_VERTICAL_DEBOUNCE: Duration = Duration::from_millis(100);
const DEFAULT_BOTTOM_THRESHOLD: Px = Px(100);
const DEFAULT_ENTER_HORIZONTAL_DELAY: Duration = Duration::from_millis(100);

/// Arguments for [`FeedController`](crate::controller::FeedController).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use phased_scroll::config::{FeedArgs, NestedScrollArgs};
/// use phased_scroll::trigger::HorizontalStrategy;
///
/// let args = FeedArgs::default()
///     .load_delay(Duration::from_millis(250))
///     .horizontal(HorizontalStrategy::NestedScroll(NestedScrollArgs::default()));
/// assert_eq!(args.load_delay, Duration::from_millis(250));
/// ```
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct FeedArgs {
    /// Time between a load request and the item appearing.
    pub load_delay: Duration,
    /// Trailing debounce window of the vertical trigger.
    pub vertical_debounce: Duration,
    /// Distance from the document end at which the vertical trigger fires.
    pub bottom_threshold: Px,
    /// Delay of the auto-advance into the horizontal phase.
    pub enter_horizontal_delay: Duration,
    /// Strategy driving the horizontal phase.
    pub horizontal: HorizontalStrategy,
}

impl Default for FeedArgs {
    fn default() -> Self {
        Self {
            load_delay: DEFAULT_LOAD_DELAY,
            vertical_debounce: DEFAULT_VERTICAL_DEBOUNCE,
            bottom_threshold: DEFAULT_BOTTOM_THRESHOLD,
            enter_horizontal_delay: DEFAULT_ENTER_HORIZONTAL_DELAY,
            horizontal: HorizontalStrategy::default(),
        }
    }
}
