use std::sync::OnceLock;

use pdf_writer::{Name, Pdf, Ref};

/// Resource names used in every content stream.
pub(crate) const REGULAR: &str = "F1";
pub(crate) const BOLD: &str = "F2";

pub(crate) struct FontEntry {
    pub(crate) pdf_name: &'static str,
    pub(crate) font_ref: Ref,
}

static HELVETICA_WIDTHS: OnceLock<Vec<f32>> = OnceLock::new();

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> &'static [f32] {
    HELVETICA_WIDTHS.get_or_init(|| {
        (32u8..=255u8)
            .map(|b| match b {
                32 => 278.0,                          // space
                33..=47 => 333.0,                     // punctuation
                48..=57 => 556.0,                     // digits
                58..=64 => 333.0,                     // more punctuation
                73 | 74 => 278.0,                     // I J (narrow uppercase)
                77 => 833.0,                          // M (wide)
                65..=90 => 667.0,                     // uppercase A-Z (average)
                91..=96 => 333.0,                     // brackets etc.
                102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
                109 | 119 => 833.0,                   // m w (wide)
                97..=122 => 556.0,                    // lowercase a-z (average)
                _ => 556.0,
            })
            .collect()
    })
}

/// Width of `text` set in Helvetica at `font_size`, in points.
/// Unmappable characters are dropped on output, so they measure as zero.
pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    let widths = helvetica_widths();
    text.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .map(|b| widths[(b - 32) as usize] * font_size / 1000.0)
        .sum()
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Tabs become spaces; other control and unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Register one of the base-14 Type1 fonts. Nothing is embedded; viewers
/// supply Helvetica themselves.
pub(crate) fn register_standard_font(
    pdf: &mut Pdf,
    base_font: &str,
    pdf_name: &'static str,
    alloc: &mut impl FnMut() -> Ref,
) -> FontEntry {
    let font_ref = alloc();
    pdf.type1_font(font_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    log::debug!("register_standard_font: {base_font} as /{pdf_name}");
    FontEntry { pdf_name, font_ref }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winansi_maps_typographic_punctuation() {
        assert_eq!(to_winansi_bytes("a\u{2014}b"), vec![b'a', 0x97, b'b']);
        assert_eq!(to_winansi_bytes("\u{2022} x"), vec![0x95, b' ', b'x']);
    }

    #[test]
    fn winansi_drops_unmappable() {
        assert_eq!(to_winansi_bytes("ok\u{4E2D}"), b"ok".to_vec());
        assert_eq!(to_winansi_bytes("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn width_scales_with_font_size() {
        let w10 = text_width("Vehicle", 10.0);
        let w20 = text_width("Vehicle", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-3);
        assert!(text_width("mmm", 10.0) > text_width("iii", 10.0));
    }
}
