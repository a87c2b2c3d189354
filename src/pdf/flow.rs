//! Vertical page flow.
//!
//! [`PageFlow`] owns the page list and the write cursor. The cursor is a PDF
//! y coordinate that starts at the top of the content area and only moves
//! down. Content occupies the band `[cursor - height, cursor]`; before drawing
//! anything, callers ask [`PageFlow::ensure_space`] for that height, which
//! starts a new page (with the banner redrawn) when the band would cross the
//! bottom safety margin.

use pdf_writer::Content;

use crate::model::PageGeometry;

use super::layout::Banner;

/// Per-page constants derived from the document's [`PageGeometry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBudget {
    pub page_width: f32,
    pub page_height: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub banner_height: f32,
}

impl LayoutBudget {
    pub fn from_geometry(g: &PageGeometry) -> Self {
        Self {
            page_width: g.page_width,
            page_height: g.page_height,
            left: g.margin_left,
            right: g.margin_right,
            bottom: g.margin_bottom,
            top: g.content_top.min(g.page_height - g.banner_height),
            banner_height: g.banner_height,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.left - self.right
    }

    /// x coordinate nothing may extend past.
    pub fn right_edge(&self) -> f32 {
        self.page_width - self.right
    }

    /// Tallest band that fits on a fresh page.
    pub fn max_block_height(&self) -> f32 {
        (self.top - self.bottom).max(0.0)
    }
}

pub struct PageFlow {
    budget: LayoutBudget,
    banner: Banner,
    pages: Vec<Content>,
    cursor: f32,
}

impl PageFlow {
    /// Start the first page, banner included.
    pub(crate) fn new(budget: LayoutBudget, banner: Banner) -> Self {
        let mut flow = Self {
            budget,
            banner,
            pages: Vec::new(),
            cursor: budget.top,
        };
        flow.new_page();
        flow
    }

    fn new_page(&mut self) {
        let mut content = Content::new();
        self.banner.draw(&mut content, &self.budget);
        self.pages.push(content);
        self.cursor = self.budget.top;
        log::debug!("page {} started", self.pages.len());
    }

    /// Guarantee room for a band of `height` below the cursor, breaking the
    /// page if needed. Returns the page index and cursor to draw at.
    ///
    /// A band taller than a whole fresh page cannot be satisfied; if the
    /// current page is still untouched it is used as-is instead of producing
    /// blank pages.
    pub fn ensure_space(&mut self, height: f32) -> (usize, f32) {
        if self.cursor - height < self.budget.bottom {
            if self.at_page_top() {
                log::warn!(
                    "band of {height:.1}pt exceeds page capacity {:.1}pt; drawing past bottom margin",
                    self.budget.max_block_height()
                );
            } else {
                self.new_page();
            }
        }
        (self.current_page(), self.cursor)
    }

    /// Move the cursor down unconditionally.
    pub fn advance(&mut self, amount: f32) {
        self.cursor -= amount;
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn at_page_top(&self) -> bool {
        (self.cursor - self.budget.top).abs() < f32::EPSILON
    }

    pub fn budget(&self) -> &LayoutBudget {
        &self.budget
    }

    /// Content stream of the current page.
    pub(crate) fn content(&mut self) -> &mut Content {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Content stream of an earlier page, for placements computed ahead of drawing.
    pub(crate) fn page_content(&mut self, index: usize) -> &mut Content {
        &mut self.pages[index]
    }

    pub(crate) fn finish(self) -> Vec<Content> {
        self.pages
    }
}
