use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MetaField {
    pub label: String,
    pub value: String,
}

impl MetaField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A titled block of free text. Newlines in `body` are kept as line breaks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TextSection {
    pub title: String,
    pub body: String,
}

impl TextSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A photo as delivered by storage: raw bytes, encoding unknown until decoded.
#[derive(Clone)]
pub struct PhotoAsset {
    pub name: String,
    pub data: Vec<u8>,
}

impl PhotoAsset {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl std::fmt::Debug for PhotoAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoAsset")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReportModel {
    pub id: String,
    /// Banner title, drawn on every page.
    pub title: String,
    /// Caller-formatted creation time. Never read from the clock so that the
    /// same model always renders to the same bytes.
    pub created_at: String,
    pub metadata: Vec<MetaField>,
    pub sections: Vec<TextSection>,
    pub photos: Vec<PhotoAsset>,
}

impl ReportModel {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    pub fn with_meta(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(MetaField::new(label, value));
        self
    }

    pub fn with_section(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(TextSection::new(title, body));
        self
    }

    pub fn with_photo(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.photos.push(PhotoAsset::new(name, data));
        self
    }
}

/// Fixed page geometry shared by every page of a document, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Nothing may be drawn below this line except the page footer.
    pub margin_bottom: f32,
    pub banner_height: f32,
    /// Cursor position at the top of a fresh page.
    pub content_top: f32,
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_bottom: 80.0,
            banner_height: 41.89,
            content_top: 780.0,
        }
    }
}

/// How the text flow engine measures a candidate line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WrapMetric {
    /// Count characters against `RenderOptions::wrap_chars`. Crude: ignores
    /// proportional glyph widths, so lines visually under/over-fill.
    CharCount,
    /// Sum Helvetica advance widths against the usable page width.
    Helvetica,
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub geometry: PageGeometry,
    pub wrap_metric: WrapMetric,
    pub wrap_chars: usize,
    /// Target photo width in points before any height clamping.
    pub thumb_width: f32,
    /// Horizontal gap between photos in a row.
    pub photo_gap: f32,
    /// Vertical room reserved under each photo row for captions.
    pub caption_allowance: f32,
    /// Drawn before the report title in the banner.
    pub brand: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            wrap_metric: WrapMetric::CharCount,
            wrap_chars: 92,
            thumb_width: 160.0,
            photo_gap: 14.0,
            caption_allowance: 18.0,
            brand: "AFRIRENT".to_string(),
        }
    }
}
