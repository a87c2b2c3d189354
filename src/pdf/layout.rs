use pdf_writer::{Content, Name, Str};

use crate::fonts::{self, to_winansi_bytes};

use super::flow::LayoutBudget;

pub(super) const TEXT_RGB: [f32; 3] = [0.18, 0.2, 0.25];
pub(super) const MUTED_RGB: [f32; 3] = [0.45, 0.47, 0.5];
pub(super) const BRAND_RGB: [f32; 3] = [0.925, 0.39, 0.145];
/// Brand orange at 8% over white.
const BANNER_TINT_RGB: [f32; 3] = [0.994, 0.951, 0.932];

const BANNER_FONT_SIZE: f32 = 14.0;
const LOGO_PADDING: f32 = 6.0;

/// Logo image already written as an XObject.
pub(crate) struct LogoRef {
    pub(crate) pdf_name: String,
    pub(crate) aspect: f32, // width / height
}

/// The page header drawn identically at the top of every page.
pub(crate) struct Banner {
    pub(crate) text: String,
    pub(crate) logo: Option<LogoRef>,
}

impl Banner {
    pub(crate) fn draw(&self, content: &mut Content, budget: &LayoutBudget) {
        let height = budget.banner_height;
        let bottom = budget.page_height - height;

        content.save_state();
        content.set_fill_rgb(BANNER_TINT_RGB[0], BANNER_TINT_RGB[1], BANNER_TINT_RGB[2]);
        content.rect(0.0, bottom, budget.page_width, height).fill_nonzero();
        content.restore_state();

        let baseline = bottom + (height - BANNER_FONT_SIZE * 0.7) / 2.0;
        draw_text(
            content,
            fonts::BOLD,
            BANNER_FONT_SIZE,
            budget.left,
            baseline,
            &self.text,
            BRAND_RGB,
        );

        if let Some(logo) = &self.logo {
            let h = (height - 2.0 * LOGO_PADDING).max(0.0);
            let w = h * logo.aspect;
            let x = budget.right_edge() - w;
            draw_image(content, &logo.pdf_name, x, bottom + LOGO_PADDING, w, h);
        }
    }
}

/// Show a single line of text with its baseline at `y`.
pub(super) fn draw_text(
    content: &mut Content,
    font: &str,
    size: f32,
    x: f32,
    y: f32,
    text: &str,
    rgb: [f32; 3],
) {
    let bytes = to_winansi_bytes(text);
    if bytes.is_empty() {
        return;
    }
    content.set_fill_rgb(rgb[0], rgb[1], rgb[2]);
    content.begin_text();
    content.set_font(Name(font.as_bytes()), size);
    content.next_line(x, y);
    content.show(Str(&bytes));
    content.end_text();
    content.set_fill_gray(0.0);
}

/// Paint an image XObject into the box with lower-left corner (`x`, `y`).
pub(super) fn draw_image(content: &mut Content, pdf_name: &str, x: f32, y: f32, w: f32, h: f32) {
    content.save_state();
    content.transform([w, 0.0, 0.0, h, x, y]);
    content.x_object(Name(pdf_name.as_bytes()));
    content.restore_state();
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width` at `size`.
/// Used for captions, metadata labels and headings.
pub(super) fn fit_width(text: &str, max_width: f32, size: f32) -> String {
    if fonts::text_width(text, size) <= max_width {
        return text.to_string();
    }
    let ellipsis = '\u{2026}';
    let budget = max_width - fonts::text_width("\u{2026}", size);
    let mut out = String::new();
    let mut w = 0.0;
    for ch in text.chars() {
        let cw = fonts::text_width(ch.encode_utf8(&mut [0u8; 4]), size);
        if w + cw > budget {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push(ellipsis);
    out
}
