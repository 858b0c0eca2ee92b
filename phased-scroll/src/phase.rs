//! Phase classification.
//!
//! The phase is a pure function of the loaded item count. It decides which
//! trigger listens for input and how the renderer lays the items out.
use std::fmt;

/// Total number of items the feed will ever create.
pub const MAX_ITEMS: usize = 50;
/// Last item count of the initial vertical phase.
pub const INITIAL_VERTICAL_END: usize = 20;
/// Last item count of the horizontal phase.
pub const HORIZONTAL_END: usize = 30;
/// Number of items shown in the horizontal phase.
pub const HORIZONTAL_ITEMS: usize = HORIZONTAL_END - INITIAL_VERTICAL_END;

/// Mutually exclusive mode of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Items 1 to 20, loaded by scrolling the page down.
    #[default]
    InitialVertical,
    /// Items 21 to 30, loaded by horizontal navigation.
    Horizontal,
    /// Items 31 to 50, loaded by scrolling the page down again.
    FinalVertical,
    /// All items are loaded.
    Complete,
}

impl Phase {
    /// Whether the vertical trigger owns this phase.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::InitialVertical | Self::FinalVertical)
    }

    /// Whether the horizontal trigger owns this phase.
    pub fn is_horizontal(self) -> bool {
        self == Self::Horizontal
    }

    /// Whether no further items can be loaded.
    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialVertical => "initial-vertical",
            Self::Horizontal => "horizontal",
            Self::FinalVertical => "final-vertical",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an item count to its phase.
///
/// Counts above [`MAX_ITEMS`] cannot occur; they classify as
/// [`Phase::Complete`].
///
/// ```
/// use phased_scroll::phase::{Phase, classify};
///
/// assert_eq!(classify(20), Phase::InitialVertical);
/// assert_eq!(classify(21), Phase::Horizontal);
/// assert_eq!(classify(50), Phase::Complete);
/// ```
pub fn classify(count: usize) -> Phase {
    if count <= INITIAL_VERTICAL_END {
        Phase::InitialVertical
    } else if count <= HORIZONTAL_END {
        Phase::Horizontal
    } else if count < MAX_ITEMS {
        Phase::FinalVertical
    } else {
        Phase::Complete
    }
}
