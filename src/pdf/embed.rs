//! Photo decoding and XObject embedding.
//!
//! Payloads arrive without a trustworthy type, so decoding is attempted as
//! PNG first and JPEG second. A payload that neither decoder accepts is an
//! [`EmbedFailure`]; the renderer drops that photo and carries on.
//!
//! JPEGs with one or three components pass through untouched (PDF reads
//! them natively via DCTDecode). PNGs, and JPEGs in other colour models, are
//! written as Flate-compressed RGB with an optional soft mask for alpha.

use std::fmt;

use pdf_writer::{Filter, Pdf, Ref};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

#[derive(Debug)]
pub struct DecodeError {
    pub format: ImageFormat,
    pub reason: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.format, self.reason)
    }
}

impl std::error::Error for DecodeError {}

/// Both decode attempts failed.
#[derive(Debug)]
pub struct EmbedFailure {
    pub png: DecodeError,
    pub jpeg: DecodeError,
}

impl fmt::Display for EmbedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a decodable image ({}; {})", self.png, self.jpeg)
    }
}

impl std::error::Error for EmbedFailure {}

#[derive(Clone)]
enum PixelData {
    /// Untouched JPEG bytes for DCTDecode.
    Dct { data: Vec<u8>, gray: bool },
    /// Decoded RGB, plus alpha when any pixel is not opaque.
    Rgb { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A validated image with its intrinsic pixel size.
#[derive(Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pixels: PixelData,
}

impl DecodedImage {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Decode `bytes`, trying PNG and then JPEG.
pub fn embed(bytes: &[u8]) -> Result<DecodedImage, EmbedFailure> {
    try_decode(bytes, ImageFormat::Png).or_else(|png| {
        try_decode(bytes, ImageFormat::Jpeg).map_err(|jpeg| EmbedFailure { png, jpeg })
    })
}

/// Decode `bytes` strictly as `format`.
pub fn try_decode(bytes: &[u8], format: ImageFormat) -> Result<DecodedImage, DecodeError> {
    let fail = |reason: String| DecodeError { format, reason };
    let codec = match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
    };

    let decoded =
        image::load_from_memory_with_format(bytes, codec).map_err(|e| fail(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(fail(format!("empty image {width}x{height}")));
    }

    let pixels = match format {
        ImageFormat::Jpeg => match jpeg_components(bytes) {
            Some(1) => PixelData::Dct { data: bytes.to_vec(), gray: true },
            Some(3) => PixelData::Dct { data: bytes.to_vec(), gray: false },
            // CMYK/YCCK and anything unrecognised: re-encode from the decoder's RGB.
            _ => split_rgba(&decoded.to_rgba8()),
        },
        ImageFormat::Png => split_rgba(&decoded.to_rgba8()),
    };

    Ok(DecodedImage {
        format,
        width,
        height,
        pixels,
    })
}

fn split_rgba(rgba: &image::RgbaImage) -> PixelData {
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
    let rgb: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());
    PixelData::Rgb { rgb, alpha }
}

/// Component count from the first SOF segment of a JPEG stream.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut i = 2; // skip SOI
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF) {
            // length(2) precision(1) height(2) width(2) components(1)
            return data.get(i + 9).copied();
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    None
}

/// Write `img` as an image XObject and return its reference.
pub(crate) fn write_xobject(
    pdf: &mut Pdf,
    img: &DecodedImage,
    alloc: &mut impl FnMut() -> Ref,
) -> Ref {
    let xobj_ref = alloc();
    let (w, h) = (img.width as i32, img.height as i32);

    match &img.pixels {
        PixelData::Dct { data, gray } => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            if *gray {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        PixelData::Rgb { rgb, alpha } => {
            let smask_ref = alpha.as_ref().map(|alpha| {
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(alpha, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });

            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(rgb, 6);
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }

    xobj_ref
}
