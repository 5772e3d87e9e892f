use std::path::PathBuf;

use thiserror::Error;

use crate::cursor::Diagnostic;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid footprint selection pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Malformed footprint file {} ({} problem(s), first: {})", .path.display(), .diagnostics.len(), first_message(.diagnostics))]
    Malformed {
        path: PathBuf,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Missing expected data: {0}")]
    MissingData(String),
}

impl Error {
    /// Wraps an `std::io::Error` together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoError {
            path: path.into(),
            source,
        }
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
