//! Row-based photo grid.
//!
//! Photos are scaled to a common width and placed left to right. A row is
//! committed to the page only when it is complete, so the page-break check
//! can use the row's final height (its tallest photo, not an average) and a
//! row that no longer fits moves to the next page as a whole.

use super::flow::{LayoutBudget, PageFlow};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub thumb_width: f32,
    pub gap: f32,
    pub caption_allowance: f32,
    /// Height drawn directly above the first row (the section heading).
    /// Photos are clamped so this plus one row still fits a fresh page.
    pub lead_height: f32,
}

/// Where one photo lands. `y` is the bottom edge of the image box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Position in the input sequence.
    pub index: usize,
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal room owned by this photo; its caption is fitted to this.
    pub slot_width: f32,
}

struct Cell {
    index: usize,
    x: f32,
    width: f32,
    height: f32,
    slot_width: f32,
}

#[derive(Default)]
struct Row {
    cells: Vec<Cell>,
    next_x: f32,
    max_height: f32,
}

impl Row {
    fn flush(&mut self, flow: &mut PageFlow, spec: &GridSpec, out: &mut Vec<Placement>) {
        if self.cells.is_empty() {
            return;
        }
        let band = self.max_height + spec.caption_allowance;
        let (page, top) = flow.ensure_space(band);
        out.extend(self.cells.drain(..).map(|c| Placement {
            index: c.index,
            page,
            x: c.x,
            y: top - c.height,
            width: c.width,
            height: c.height,
            slot_width: c.slot_width,
        }));
        log::debug!("grid row committed on page {}: height {:.1}pt", page + 1, band);
        flow.advance(band);
        self.max_height = 0.0;
    }
}

/// Scale a `width`×`height` image to `thumb_width`, then shrink it further if
/// it would be taller than `max_height`. Aspect ratio is always preserved.
pub fn scaled_size(width: f32, height: f32, thumb_width: f32, max_height: f32) -> (f32, f32) {
    let scale = thumb_width / width;
    let (w, h) = (thumb_width, height * scale);
    if h > max_height && h > 0.0 {
        let shrink = max_height / h;
        (w * shrink, max_height)
    } else {
        (w, h)
    }
}

/// Effective thumbnail width and the tallest photo a fresh page can hold
/// together with the lead and a caption.
fn limits(budget: &LayoutBudget, spec: &GridSpec) -> (f32, f32) {
    let thumb_width = spec.thumb_width.min(budget.usable_width());
    let max_height =
        (budget.max_block_height() - spec.caption_allowance - spec.lead_height).max(1.0);
    (thumb_width, max_height)
}

/// Height of the first row [`layout_grid`] would build, captions excluded.
pub fn first_row_height(budget: &LayoutBudget, sizes: &[(f32, f32)], spec: &GridSpec) -> f32 {
    let (thumb_width, max_height) = limits(budget, spec);
    let mut x = budget.left;
    let mut tallest = 0.0f32;
    for (i, &(pw, ph)) in sizes.iter().enumerate() {
        let (_, h) = scaled_size(pw, ph, thumb_width, max_height);
        if i > 0 && x + thumb_width > budget.right_edge() {
            break;
        }
        tallest = tallest.max(h);
        x += thumb_width + spec.gap;
    }
    tallest
}

/// Lay out `sizes` (intrinsic pixel width/height, in order) below the flow's
/// cursor and return one placement per input, in input order.
///
/// Every photo owns a slot of the thumbnail width, so photos shrunk by the
/// height clamp keep a full-width caption and the columns stay aligned.
pub fn layout_grid(flow: &mut PageFlow, sizes: &[(f32, f32)], spec: &GridSpec) -> Vec<Placement> {
    let budget = *flow.budget();
    let (thumb_width, max_height) = limits(&budget, spec);

    let mut out = Vec::with_capacity(sizes.len());
    let mut row = Row {
        next_x: budget.left,
        ..Row::default()
    };

    for (index, &(pw, ph)) in sizes.iter().enumerate() {
        let (w, h) = scaled_size(pw, ph, thumb_width, max_height);

        if !row.cells.is_empty() && row.next_x + thumb_width > budget.right_edge() {
            row.flush(flow, spec, &mut out);
            row.next_x = budget.left;
        }

        row.cells.push(Cell {
            index,
            x: row.next_x,
            width: w,
            height: h,
            slot_width: thumb_width,
        });
        row.next_x += thumb_width + spec.gap;
        row.max_height = row.max_height.max(h);
    }
    row.flush(flow, spec, &mut out);

    out
}
