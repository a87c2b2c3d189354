//! JSON job manifests for the command-line front end.
//!
//! ```json
//! {
//!   "report": { "kind": "audit", "id": "A-17", "vehicleReg": "CA 123-456" },
//!   "photos": ["front.jpg", { "path": "rear.png", "name": "Rear bumper" }],
//!   "logo": "brand/logo.png"
//! }
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{MetaField, PhotoAsset, ReportModel, TextSection};
use crate::records::{AuditRecord, QuoteRecord};

/// A report given directly as metadata rows and sections.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericReport {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub metadata: Vec<MetaField>,
    #[serde(default)]
    pub sections: Vec<TextSection>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    Audit(AuditRecord),
    Quote(QuoteRecord),
    Report(GenericReport),
}

impl From<ReportSource> for ReportModel {
    fn from(source: ReportSource) -> Self {
        match source {
            ReportSource::Audit(a) => a.into(),
            ReportSource::Quote(q) => q.into(),
            ReportSource::Report(r) => ReportModel {
                id: r.id,
                title: r.title,
                created_at: r.created_at,
                metadata: r.metadata,
                sections: r.sections,
                photos: Vec::new(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PhotoRef {
    Path(PathBuf),
    Named { path: PathBuf, name: Option<String> },
}

impl PhotoRef {
    pub fn path(&self) -> &Path {
        match self {
            PhotoRef::Path(path) | PhotoRef::Named { path, .. } => path,
        }
    }

    /// Caption under the photo: the explicit name, else the file name.
    pub fn display_name(&self) -> String {
        match self {
            PhotoRef::Named { name: Some(name), .. } if !name.trim().is_empty() => name.clone(),
            _ => self
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Manifest {
    pub report: ReportSource,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    pub logo: Option<PathBuf>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A manifest with every referenced file read into memory.
#[derive(Debug)]
pub struct LoadedJob {
    pub report: ReportModel,
    pub logo: Option<Vec<u8>>,
}

/// Read and parse the manifest at `path`, then fetch its photos and logo.
pub fn load(path: &Path) -> Result<LoadedJob, Error> {
    let json = std::fs::read_to_string(path).map_err(Error::Io)?;
    let manifest = Manifest::from_json(&json)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(resolve(manifest, base))
}

/// Read a banner logo. A missing or unreadable file means no logo.
pub fn read_logo(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Logo {} not readable, banner drawn without it: {e}", path.display());
            None
        }
    }
}

/// Read photos in parallel; the result keeps manifest order. Files that
/// cannot be read are left out, the same way undecodable photos are.
pub fn resolve(manifest: Manifest, base: &Path) -> LoadedJob {
    let photos: Vec<PhotoAsset> = manifest
        .photos
        .par_iter()
        .filter_map(|photo| {
            let full = base.join(photo.path());
            match std::fs::read(&full) {
                Ok(data) => Some(PhotoAsset::new(photo.display_name(), data)),
                Err(e) => {
                    log::warn!("Photo {} not readable, skipped: {e}", full.display());
                    None
                }
            }
        })
        .collect();

    let logo = manifest.logo.as_ref().and_then(|logo| read_logo(&base.join(logo)));

    let mut report = ReportModel::from(manifest.report);
    report.photos = photos;
    log::debug!(
        "Manifest resolved: {} photos, logo {}",
        report.photos.len(),
        if logo.is_some() { "present" } else { "absent" }
    );

    LoadedJob { report, logo }
}
