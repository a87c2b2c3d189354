use std::fmt;

/// Errors that abort a whole report build.
///
/// Per-photo and per-logo problems never surface here; they are absorbed by the
/// renderer and only show up as missing content in the output.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The report model is structurally unusable (e.g. blank identifier).
    InvalidReport(String),
    /// The JSON manifest could not be read as a report description.
    InvalidManifest(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidReport(msg) => write!(f, "Invalid report: {msg}"),
            Error::InvalidManifest(msg) => write!(f, "Invalid manifest: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidManifest(e.to_string())
    }
}
