//! Synthetic page layout standing in for a rendering surface.
use phased_scroll::{
    geometry::{GeometryError, PageMetrics, SectionBounds, StripMetrics, ViewportGeometry},
    phase::{HORIZONTAL_END, INITIAL_VERTICAL_END, Phase, classify},
    px::Px,
};

const HEADER_HEIGHT: Px = Px(96);
const VERTICAL_CARD: Px = Px(176);
const VERTICAL_GAP: Px = Px(32);
const HORIZONTAL_CARD: Px = Px(320);
const HORIZONTAL_GAP: Px = Px(32);
const BOTTOM_SPACER: Px = Px(384);
const STRIP_GUTTER: Px = Px(64);
const NESTED_SECTION_HEIGHT: Px = Px(416);
const PIN_TRACK_VIEWPORTS: i32 = 4;

/// How the horizontal section is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    /// A short section holding its own scroll container.
    Nested,
    /// A tall track the page scrolls through while the section stays pinned.
    Pinned,
}

/// Page whose layout follows the item count.
#[derive(Debug, Clone)]
pub struct SimulatedPage {
    layout: SectionLayout,
    viewport_width: Px,
    viewport_height: Px,
    count: usize,
    scroll_top: Px,
    strip_scroll_left: Px,
}

impl SimulatedPage {
    pub fn new(layout: SectionLayout, viewport_width: Px, viewport_height: Px) -> Self {
        Self {
            layout,
            viewport_width,
            viewport_height,
            count: 0,
            scroll_top: Px::ZERO,
            strip_scroll_left: Px::ZERO,
        }
    }

    pub fn layout(&self) -> SectionLayout {
        self.layout
    }

    pub fn scroll_top(&self) -> Px {
        self.scroll_top
    }

    /// Re-lays the page out for `count` items and re-clamps scroll offsets.
    /// Returns `true` when the count changed.
    pub fn set_item_count(&mut self, count: usize) -> bool {
        if count == self.count {
            return false;
        }
        self.count = count;
        self.scroll_top = self.scroll_top.clamp(Px::ZERO, self.max_scroll_top());
        let max_left = self.strip_width().saturating_sub(self.strip_client_width()).positive();
        self.strip_scroll_left = self.strip_scroll_left.clamp(Px::ZERO, max_left);
        true
    }

    /// Scrolls the page by `delta`. Returns `false` when the offset did not
    /// move, in which case a browser would not emit a scroll event.
    pub fn scroll_page_by(&mut self, delta: Px) -> bool {
        let next = self
            .scroll_top
            .saturating_add(delta)
            .clamp(Px::ZERO, self.max_scroll_top());
        let moved = next != self.scroll_top;
        self.scroll_top = next;
        moved
    }

    fn phase(&self) -> Phase {
        classify(self.count)
    }

    fn initial_count(&self) -> usize {
        self.count.min(INITIAL_VERTICAL_END)
    }

    fn horizontal_count(&self) -> usize {
        self.count
            .saturating_sub(INITIAL_VERTICAL_END)
            .min(HORIZONTAL_END - INITIAL_VERTICAL_END)
    }

    fn final_count(&self) -> usize {
        self.count.saturating_sub(HORIZONTAL_END)
    }

    fn section_top(&self) -> Px {
        HEADER_HEIGHT.saturating_add(
            VERTICAL_CARD
                .saturating_add(VERTICAL_GAP)
                .saturating_mul_count(self.initial_count()),
        )
    }

    fn section_height(&self) -> Px {
        if self.horizontal_count() == 0 {
            return Px::ZERO;
        }
        match self.layout {
            SectionLayout::Nested => NESTED_SECTION_HEIGHT,
            SectionLayout::Pinned => self.viewport_height * PIN_TRACK_VIEWPORTS,
        }
    }

    fn document_height(&self) -> Px {
        let finals = VERTICAL_CARD
            .saturating_add(VERTICAL_GAP)
            .saturating_mul_count(self.final_count());
        let content = self
            .section_top()
            .saturating_add(self.section_height())
            .saturating_add(finals);
        if self.phase().is_horizontal() {
            content
        } else {
            // The spacer keeps a short feed scrollable.
            content
                .saturating_add(BOTTOM_SPACER)
                .max(self.viewport_height.saturating_add(BOTTOM_SPACER))
        }
    }

    fn max_scroll_top(&self) -> Px {
        self.document_height()
            .saturating_sub(self.viewport_height)
            .positive()
    }

    fn strip_client_width(&self) -> Px {
        match self.layout {
            SectionLayout::Nested => self.viewport_width.saturating_sub(STRIP_GUTTER * 2),
            SectionLayout::Pinned => self.viewport_width,
        }
    }

    fn strip_width(&self) -> Px {
        HORIZONTAL_CARD
            .saturating_add(HORIZONTAL_GAP)
            .saturating_mul_count(self.horizontal_count())
            .saturating_sub(HORIZONTAL_GAP)
            .positive()
    }
}

impl ViewportGeometry for SimulatedPage {
    fn page(&self) -> Result<PageMetrics, GeometryError> {
        Ok(PageMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport_height,
            viewport_width: self.viewport_width,
            document_height: self.document_height(),
        })
    }

    fn horizontal_section(&self) -> Result<SectionBounds, GeometryError> {
        if self.horizontal_count() == 0 {
            return Err(GeometryError::NotMounted("horizontal section"));
        }
        Ok(SectionBounds {
            top: self.section_top(),
            height: self.section_height(),
        })
    }

    fn strip(&self) -> Result<StripMetrics, GeometryError> {
        if self.horizontal_count() == 0 {
            return Err(GeometryError::NotMounted("strip"));
        }
        Ok(StripMetrics {
            scroll_left: self.strip_scroll_left,
            client_width: self.strip_client_width(),
            scroll_width: self.strip_width().max(self.strip_client_width()),
        })
    }

    fn scroll_strip_by(&mut self, delta: Px) -> Result<(), GeometryError> {
        let strip = self.strip()?;
        self.strip_scroll_left = strip
            .scroll_left
            .saturating_add(delta)
            .clamp(Px::ZERO, strip.max_scroll_left());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(layout: SectionLayout, count: usize) -> SimulatedPage {
        let mut page = SimulatedPage::new(layout, Px(1280), Px(800));
        assert_eq!(page.set_item_count(count), count != 0);
        page
    }

    #[test]
    fn test_initial_layout_has_no_section() {
        let page = page(SectionLayout::Pinned, 6);
        assert_eq!(page.document_height(), Px(96 + 6 * 208 + 384));
        assert!(page.horizontal_section().is_err());
        assert!(page.strip().is_err());
    }

    #[test]
    fn test_pinned_track_is_four_viewports_tall() {
        let page = page(SectionLayout::Pinned, 21);
        let section = page.horizontal_section().expect("section mounted");
        assert_eq!(section.top, Px(96 + 20 * 208));
        assert_eq!(section.height, Px(3200));
        assert_eq!(page.document_height(), section.bottom());
    }

    #[test]
    fn test_final_cards_follow_the_section() {
        let page = page(SectionLayout::Nested, 33);
        let section = page.horizontal_section().expect("section mounted");
        assert_eq!(
            page.document_height(),
            section.bottom() + Px(3 * 208) + BOTTOM_SPACER
        );
    }

    #[test]
    fn test_strip_scroll_is_clamped() {
        let mut page = page(SectionLayout::Nested, 25);
        page.scroll_strip_by(Px(10_000)).expect("strip mounted");
        let strip = page.strip().expect("strip mounted");
        assert_eq!(strip.scroll_width, Px(5 * 352 - 32));
        assert_eq!(strip.scroll_left, strip.max_scroll_left());
    }

    #[test]
    fn test_short_feed_stays_scrollable() {
        let page = page(SectionLayout::Pinned, 1);
        assert_eq!(page.document_height(), Px(800 + 384));
    }

    #[test]
    fn test_page_scroll_reports_movement() {
        let mut page = page(SectionLayout::Pinned, 1);
        assert!(page.scroll_page_by(Px(500)));
        assert_eq!(page.scroll_top(), Px(384));
        assert!(!page.scroll_page_by(Px(24)), "already at the end");

        assert!(page.set_item_count(6));
        assert!(!page.set_item_count(6));
        assert!(page.scroll_page_by(Px(24)));
        assert!(page.scroll_page_by(Px(-1000)));
        assert_eq!(page.scroll_top(), Px::ZERO);
    }
}
