//! Viewport geometry provider.
//!
//! Triggers never touch a rendering surface directly. They ask a
//! [`ViewportGeometry`] for the handful of measurements their decisions need,
//! and treat a [`GeometryError`] as "not measurable yet, skip this round".
use thiserror::Error;

use crate::px::Px;

/// Page-level scroll measurements, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMetrics {
    /// Vertical page scroll offset.
    pub scroll_top: Px,
    /// Height of the visible viewport.
    pub viewport_height: Px,
    /// Width of the visible viewport.
    pub viewport_width: Px,
    /// Total scrollable height of the document.
    pub document_height: Px,
}

impl PageMetrics {
    /// Document-space Y coordinate of the viewport's bottom edge.
    pub fn viewport_bottom(&self) -> Px {
        self.scroll_top.saturating_add(self.viewport_height)
    }
}

/// Document-space vertical extent of the horizontal section.
///
/// In the pinned-translate strategy this is the tall track the page scrolls
/// through while the section stays pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionBounds {
    /// Top edge.
    pub top: Px,
    /// Height.
    pub height: Px,
}

impl SectionBounds {
    /// Bottom edge.
    pub fn bottom(&self) -> Px {
        self.top.saturating_add(self.height)
    }
}

/// Measurements of the horizontally movable strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripMetrics {
    /// Current horizontal scroll offset of the strip's container.
    pub scroll_left: Px,
    /// Visible width of the container.
    pub client_width: Px,
    /// Full scrollable width of the strip.
    pub scroll_width: Px,
}

impl StripMetrics {
    /// Largest valid `scroll_left`.
    pub fn max_scroll_left(&self) -> Px {
        self.scroll_width.saturating_sub(self.client_width).positive()
    }
}

/// Why a measurement could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The element has not been laid out yet.
    #[error("{0} is not mounted")]
    NotMounted(&'static str),
    /// The element is laid out but its measurements cannot drive a decision.
    #[error("{what} has degenerate geometry: {detail}")]
    Degenerate {
        /// Which element.
        what: &'static str,
        /// What is wrong with it.
        detail: String,
    },
}

/// Host-provided access to the measurements the triggers need.
pub trait ViewportGeometry {
    /// Page scroll offset and sizes.
    fn page(&self) -> Result<PageMetrics, GeometryError>;

    /// Bounds of the horizontal section (the pin track in the pinned
    /// strategy).
    fn horizontal_section(&self) -> Result<SectionBounds, GeometryError>;

    /// Strip container measurements.
    fn strip(&self) -> Result<StripMetrics, GeometryError>;

    /// Scrolls the strip container horizontally by `delta`. The host clamps
    /// the result to the container's scroll range.
    fn scroll_strip_by(&mut self, delta: Px) -> Result<(), GeometryError>;
}

impl<G: ViewportGeometry + ?Sized> ViewportGeometry for Box<G> {
    fn page(&self) -> Result<PageMetrics, GeometryError> {
        (**self).page()
    }

    fn horizontal_section(&self) -> Result<SectionBounds, GeometryError> {
        (**self).horizontal_section()
    }

    fn strip(&self) -> Result<StripMetrics, GeometryError> {
        (**self).strip()
    }

    fn scroll_strip_by(&mut self, delta: Px) -> Result<(), GeometryError> {
        (**self).scroll_strip_by(delta)
    }
}

/// Synthetic geometry for tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// Settable geometry where every measurement is optional.
    ///
    /// A `None` measurement reports [`GeometryError::NotMounted`].
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct FixedGeometry {
        /// Page metrics.
        pub page: Option<PageMetrics>,
        /// Horizontal section bounds.
        pub section: Option<SectionBounds>,
        /// Strip metrics.
        pub strip: Option<StripMetrics>,
    }

    impl FixedGeometry {
        /// Geometry with only page metrics.
        pub fn with_page(scroll_top: i32, viewport_height: i32, document_height: i32) -> Self {
            Self {
                page: Some(PageMetrics {
                    scroll_top: Px(scroll_top),
                    viewport_height: Px(viewport_height),
                    viewport_width: Px(1280),
                    document_height: Px(document_height),
                }),
                ..Default::default()
            }
        }

        /// Adds section bounds.
        pub fn with_section(mut self, top: i32, height: i32) -> Self {
            self.section = Some(SectionBounds {
                top: Px(top),
                height: Px(height),
            });
            self
        }

        /// Adds strip metrics.
        pub fn with_strip(mut self, scroll_left: i32, client_width: i32, scroll_width: i32) -> Self {
            self.strip = Some(StripMetrics {
                scroll_left: Px(scroll_left),
                client_width: Px(client_width),
                scroll_width: Px(scroll_width),
            });
            self
        }

        /// Moves the page scroll offset.
        pub fn set_scroll_top(&mut self, scroll_top: i32) {
            if let Some(page) = self.page.as_mut() {
                page.scroll_top = Px(scroll_top);
            }
        }

        /// Changes the document height.
        pub fn set_document_height(&mut self, document_height: i32) {
            if let Some(page) = self.page.as_mut() {
                page.document_height = Px(document_height);
            }
        }
    }

    impl ViewportGeometry for FixedGeometry {
        fn page(&self) -> Result<PageMetrics, GeometryError> {
            self.page.ok_or(GeometryError::NotMounted("page"))
        }

        fn horizontal_section(&self) -> Result<SectionBounds, GeometryError> {
            self.section
                .ok_or(GeometryError::NotMounted("horizontal section"))
        }

        fn strip(&self) -> Result<StripMetrics, GeometryError> {
            self.strip.ok_or(GeometryError::NotMounted("strip"))
        }

        fn scroll_strip_by(&mut self, delta: Px) -> Result<(), GeometryError> {
            let strip = self
                .strip
                .as_mut()
                .ok_or(GeometryError::NotMounted("strip"))?;
            let max = strip.max_scroll_left();
            strip.scroll_left = strip.scroll_left.saturating_add(delta).clamp(Px::ZERO, max);
            Ok(())
        }
    }
}
