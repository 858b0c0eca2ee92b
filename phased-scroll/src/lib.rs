//! Phased progressive-loading scroll controller.
//!
//! A feed reveals up to [`MAX_ITEMS`](phase::MAX_ITEMS) numbered items one
//! load at a time, gated by where the user has scrolled. The feed moves
//! through three phases derived purely from the item count: a vertical list,
//! a horizontally navigated strip and a second vertical list.
//!
//! - [`sequencer`] owns the item list and the single in-flight load.
//! - [`phase`] maps the item count to the active [`Phase`](phase::Phase).
//! - [`trigger`] turns scroll and wheel input into load requests, with two
//!   interchangeable strategies for the horizontal phase.
//! - [`auto_advance`] loads at fixed count boundaries without any input.
//! - [`controller`] composes all of the above behind the host entry points.
//!
//! The host owns the layout. It exposes measurements through
//! [`ViewportGeometry`](geometry::ViewportGeometry), forwards raw input with
//! the current time and renders from [`FeedSnapshot`](controller::FeedSnapshot).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use phased_scroll::{
//!     config::FeedArgs,
//!     controller::FeedController,
//!     geometry::{GeometryError, PageMetrics, SectionBounds, StripMetrics, ViewportGeometry},
//!     phase::Phase,
//!     px::Px,
//! };
//!
//! /// A page that is always scrolled to its end.
//! struct ShortPage;
//!
//! impl ViewportGeometry for ShortPage {
//!     fn page(&self) -> Result<PageMetrics, GeometryError> {
//!         Ok(PageMetrics {
//!             scroll_top: Px(800),
//!             viewport_height: Px(800),
//!             viewport_width: Px(1280),
//!             document_height: Px(1500),
//!         })
//!     }
//!
//!     fn horizontal_section(&self) -> Result<SectionBounds, GeometryError> {
//!         Err(GeometryError::NotMounted("horizontal section"))
//!     }
//!
//!     fn strip(&self) -> Result<StripMetrics, GeometryError> {
//!         Err(GeometryError::NotMounted("strip"))
//!     }
//!
//!     fn scroll_strip_by(&mut self, _delta: Px) -> Result<(), GeometryError> {
//!         Err(GeometryError::NotMounted("strip"))
//!     }
//! }
//!
//! let mut feed = FeedController::new(FeedArgs::default(), ShortPage);
//! feed.subscribe(|snapshot| println!("{} items, {}", snapshot.item_ids.len(), snapshot.phase));
//!
//! feed.mount(Duration::ZERO);
//! feed.advance_to(Duration::from_millis(500));
//!
//! feed.on_page_scroll(Duration::from_millis(600));
//! feed.run_until_idle();
//! assert_eq!(feed.item_count(), 2);
//! assert_eq!(feed.phase(), Phase::InitialVertical);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod auto_advance;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod geometry;
pub mod phase;
pub mod px;
pub mod sequencer;
pub mod task;
pub mod trigger;

pub use crate::{
    config::FeedArgs,
    controller::{FeedController, FeedHandle, FeedSnapshot, SubscriptionKey},
    phase::Phase,
    px::Px,
    trigger::{HorizontalStrategy, PinState, WheelDelta, WheelDisposition},
};
