mod error;
mod fonts;
pub mod manifest;
mod model;
mod pdf;
pub mod records;

pub use error::Error;
pub use model::{
    MetaField, PageGeometry, PhotoAsset, RenderOptions, ReportModel, TextSection, WrapMetric,
};
pub use pdf::{RenderOutcome, embed, wrap};

use std::path::Path;
use std::time::Instant;

/// Render `report` with default options and return the PDF bytes.
pub fn render_report(report: &ReportModel, logo: Option<&[u8]>) -> Result<Vec<u8>, Error> {
    pdf::render(report, logo, &RenderOptions::default()).map(|outcome| outcome.bytes)
}

pub fn render_report_with_outcome(
    report: &ReportModel,
    logo: Option<&[u8]>,
    opts: &RenderOptions,
) -> Result<RenderOutcome, Error> {
    pdf::render(report, logo, opts)
}

/// Load a JSON manifest, render it and write the PDF to `output`.
pub fn convert_manifest_to_pdf(
    input: &Path,
    output: &Path,
    opts: &RenderOptions,
) -> Result<RenderOutcome, Error> {
    convert_manifest_with_logo(input, output, None, opts)
}

/// Like [`convert_manifest_to_pdf`], with `logo` replacing the manifest's logo.
/// An unreadable override is logged and the manifest's logo (if any) is used.
pub fn convert_manifest_with_logo(
    input: &Path,
    output: &Path,
    logo: Option<&Path>,
    opts: &RenderOptions,
) -> Result<RenderOutcome, Error> {
    let t0 = Instant::now();

    let mut job = manifest::load(input)?;
    if let Some(bytes) = logo.and_then(manifest::read_logo) {
        job.logo = Some(bytes);
    }
    let t_load = t0.elapsed();

    let outcome = pdf::render(&job.report, job.logo.as_deref(), opts)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &outcome.bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_render - t_load).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        outcome.bytes.len(),
    );

    Ok(outcome)
}
