pub mod embed;
mod flow;
mod grid;
mod layout;
pub mod wrap;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::fonts::{self, register_standard_font, text_width};
use crate::model::{MetaField, RenderOptions, ReportModel, TextSection, WrapMetric};

use flow::{LayoutBudget, PageFlow};
use grid::{GridSpec, Placement, first_row_height, layout_grid};
use layout::{Banner, LogoRef, MUTED_RGB, TEXT_RGB, draw_image, draw_text, fit_width};

const META_FONT_SIZE: f32 = 11.0;
const META_LINE_H: f32 = 18.0;
const META_VALUE_OFFSET: f32 = 140.0;
const META_LABEL_GAP: f32 = 8.0; // minimum space between a label and its value

const HEADING_FONT_SIZE: f32 = 12.0;
const HEADING_H: f32 = 16.0;
const SECTION_GAP: f32 = 8.0;
const PHOTOS_GAP: f32 = 12.0;

const BODY_FONT_SIZE: f32 = 10.0;
const BODY_LINE_H: f32 = 14.0;

const CAPTION_FONT_SIZE: f32 = 9.0;
const CAPTION_OFFSET: f32 = 12.0; // caption baseline below the image's bottom edge

const FOOTER_FONT_SIZE: f32 = 8.0;

/// The rendered document plus what happened while laying it out.
#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub photos_placed: usize,
    pub photos_skipped: usize,
    /// Wrapped body lines drawn across all text sections.
    pub text_lines: usize,
}

/// A photo that survived decoding and now lives in the PDF as an XObject.
struct EmbeddedPhoto<'a> {
    caption: &'a str,
    pdf_name: String,
    width: f32,
    height: f32,
}

pub fn render(
    report: &ReportModel,
    logo: Option<&[u8]>,
    opts: &RenderOptions,
) -> Result<RenderOutcome, Error> {
    let t0 = std::time::Instant::now();

    if report.id.trim().is_empty() {
        return Err(Error::InvalidReport("report identifier is missing".to_string()));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: fonts (base-14, nothing embedded)
    let font_entries = [
        register_standard_font(&mut pdf, "Helvetica", fonts::REGULAR, &mut alloc),
        register_standard_font(&mut pdf, "Helvetica-Bold", fonts::BOLD, &mut alloc),
    ];

    // Phase 1b: decode and embed logo and photos, in collection order
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();

    let mut logo_ref = None;
    if let Some(bytes) = logo.filter(|b| !b.is_empty()) {
        match embed::embed(bytes) {
            Ok(img) => {
                let xobj_ref = embed::write_xobject(&mut pdf, &img, &mut alloc);
                image_xobjects.push(("Logo".to_string(), xobj_ref));
                logo_ref = Some(LogoRef {
                    pdf_name: "Logo".to_string(),
                    aspect: img.aspect(),
                });
            }
            Err(e) => log::warn!("Logo skipped, banner drawn without it: {e}"),
        }
    }

    let mut photos: Vec<EmbeddedPhoto> = Vec::with_capacity(report.photos.len());
    let mut photos_skipped = 0usize;
    for photo in &report.photos {
        match embed::embed(&photo.data) {
            Ok(img) => {
                let pdf_name = format!("Im{}", photos.len() + 1);
                let xobj_ref = embed::write_xobject(&mut pdf, &img, &mut alloc);
                image_xobjects.push((pdf_name.clone(), xobj_ref));
                photos.push(EmbeddedPhoto {
                    caption: &photo.name,
                    pdf_name,
                    width: img.width as f32,
                    height: img.height as f32,
                });
            }
            Err(e) => {
                photos_skipped += 1;
                log::warn!("Photo {:?} skipped: {e}", photo.name);
            }
        }
    }

    let t_images = t0.elapsed();

    // Phase 2: single forward layout pass
    let budget = LayoutBudget::from_geometry(&opts.geometry);
    let banner = Banner {
        text: banner_text(&opts.brand, &report.title),
        logo: logo_ref,
    };
    let mut flow = PageFlow::new(budget, banner);

    render_metadata(&mut flow, &report.metadata);

    let mut text_lines = 0usize;
    for section in &report.sections {
        text_lines += render_section(&mut flow, section, opts);
    }

    log::debug!(
        "text flow finished on page {} at y={:.1}",
        flow.current_page() + 1,
        flow.cursor()
    );

    let photos_placed = render_photos(&mut flow, &photos, opts).len();

    let n = flow.page_count();
    let mut all_contents = flow.finish();

    // Phase 2b: footers, now that the page count is known
    for (i, content) in all_contents.iter_mut().enumerate() {
        let baseline = budget.bottom / 2.0;
        let left = if report.created_at.trim().is_empty() {
            report.id.clone()
        } else {
            format!("{} \u{00B7} {}", report.id, report.created_at)
        };
        let right = format!("Page {} of {}", i + 1, n);
        let right_x = budget.right_edge() - text_width(&right, FOOTER_FONT_SIZE);
        for (x, text) in [(budget.left, &left), (right_x, &right)] {
            draw_text(content, fonts::REGULAR, FOOTER_FONT_SIZE, x, baseline, text, MUTED_RGB);
        }
    }

    let t_layout = t0.elapsed();

    // Phase 3: allocate page and content IDs now that page count is known
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, budget.page_width, budget.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for entry in &font_entries {
                fonts.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let doc_title = if report.title.is_empty() {
        report.id.clone()
    } else {
        format!("{} {}", report.title, report.id)
    };
    pdf.document_info(info_id)
        .title(TextStr(&doc_title))
        .producer(TextStr(concat!("fleet-report ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    let t_total = t0.elapsed();

    log::info!(
        "Render phases: images={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} pages, {} photos placed, {} skipped, {} bytes)",
        t_images.as_secs_f64() * 1000.0,
        (t_layout - t_images).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        n,
        photos_placed,
        photos_skipped,
        bytes.len(),
    );

    Ok(RenderOutcome {
        bytes,
        page_count: n,
        photos_placed,
        photos_skipped,
        text_lines,
    })
}

fn banner_text(brand: &str, title: &str) -> String {
    match (brand.trim().is_empty(), title.trim().is_empty()) {
        (true, _) => title.to_string(),
        (false, true) => brand.to_string(),
        (false, false) => format!("{brand} \u{2013} {title}"),
    }
}

/// Value lines for one metadata row. A single-line value that fits the
/// column is kept exactly as given; anything else goes through the wrapper.
fn metadata_lines(value: &str, value_width: f32) -> Vec<String> {
    if value.trim().is_empty() {
        return vec!["-".to_string()];
    }
    if !value.contains(['\n', '\r']) && text_width(value, META_FONT_SIZE) <= value_width {
        return vec![value.to_string()];
    }
    wrap::wrap_by(value, value_width, |s| text_width(s, META_FONT_SIZE))
}

/// Label/value rows. Long values wrap inside the value column; every
/// continuation line is its own row with its own space check.
fn render_metadata(flow: &mut PageFlow, fields: &[MetaField]) {
    let left = flow.budget().left;
    let value_x = left + META_VALUE_OFFSET;
    let value_width = flow.budget().right_edge() - value_x;

    for field in fields {
        let lines = metadata_lines(&field.value, value_width);
        let label = fit_width(
            &format!("{}:", field.label),
            META_VALUE_OFFSET - META_LABEL_GAP,
            META_FONT_SIZE,
        );

        for (i, line) in lines.iter().enumerate() {
            let (_, top) = flow.ensure_space(META_LINE_H);
            let baseline = top - META_FONT_SIZE;
            let content = flow.content();
            if i == 0 {
                draw_text(content, fonts::BOLD, META_FONT_SIZE, left, baseline, &label, TEXT_RGB);
            }
            draw_text(content, fonts::REGULAR, META_FONT_SIZE, value_x, baseline, line, TEXT_RGB);
            flow.advance(META_LINE_H);
        }
    }
}

fn wrap_body(body: &str, opts: &RenderOptions, budget: &LayoutBudget) -> Vec<String> {
    match opts.wrap_metric {
        WrapMetric::CharCount => wrap::wrap(body, opts.wrap_chars),
        WrapMetric::Helvetica => wrap::wrap_by(body, budget.usable_width(), |s| {
            text_width(s, BODY_FONT_SIZE)
        }),
    }
}

fn render_heading(flow: &mut PageFlow, title: &str, keep_with: f32) {
    let left = flow.budget().left;
    let title = fit_width(title, flow.budget().usable_width(), HEADING_FONT_SIZE);
    let request = (HEADING_H + keep_with).min(flow.budget().max_block_height());
    let (_, top) = flow.ensure_space(request);
    draw_text(
        flow.content(),
        fonts::BOLD,
        HEADING_FONT_SIZE,
        left,
        top - HEADING_FONT_SIZE,
        &title,
        TEXT_RGB,
    );
    flow.advance(HEADING_H);
}

/// Title plus wrapped body; returns the number of body lines drawn.
fn render_section(flow: &mut PageFlow, section: &TextSection, opts: &RenderOptions) -> usize {
    let mut lines = wrap_body(&section.body, opts, flow.budget());
    if lines.is_empty() {
        lines.push("-".to_string());
    }

    if !flow.at_page_top() {
        flow.advance(SECTION_GAP);
    }
    // Never leave a heading alone at the bottom of a page.
    render_heading(flow, &section.title, BODY_LINE_H);

    let left = flow.budget().left;
    for line in &lines {
        let (_, top) = flow.ensure_space(BODY_LINE_H);
        draw_text(
            flow.content(),
            fonts::REGULAR,
            BODY_FONT_SIZE,
            left,
            top - BODY_FONT_SIZE,
            line,
            TEXT_RGB,
        );
        flow.advance(BODY_LINE_H);
    }

    lines.len()
}

fn render_photos(
    flow: &mut PageFlow,
    photos: &[EmbeddedPhoto],
    opts: &RenderOptions,
) -> Vec<Placement> {
    if photos.is_empty() {
        return Vec::new();
    }

    let spec = GridSpec {
        thumb_width: opts.thumb_width,
        gap: opts.photo_gap,
        caption_allowance: opts.caption_allowance,
        lead_height: HEADING_H,
    };
    let sizes: Vec<(f32, f32)> = photos.iter().map(|p| (p.width, p.height)).collect();

    if !flow.at_page_top() {
        flow.advance(PHOTOS_GAP);
    }
    let first_row = first_row_height(flow.budget(), &sizes, &spec) + spec.caption_allowance;
    render_heading(flow, "Photos", first_row);

    let placements = layout_grid(flow, &sizes, &spec);
    for p in &placements {
        let photo = &photos[p.index];
        let content = flow.page_content(p.page);
        draw_image(content, &photo.pdf_name, p.x, p.y, p.width, p.height);
        let caption = fit_width(photo.caption, p.slot_width, CAPTION_FONT_SIZE);
        draw_text(
            content,
            fonts::REGULAR,
            CAPTION_FONT_SIZE,
            p.x,
            p.y - CAPTION_OFFSET,
            &caption,
            MUTED_RGB,
        );
    }

    placements
}
