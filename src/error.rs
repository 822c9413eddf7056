use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the splitter.
///
/// Only `Configuration` aborts a whole run. Extraction problems degrade to
/// empty page text and write problems are recorded against the page.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to extract text for page {page}: {reason}")]
    Extraction { page: usize, reason: String },

    #[error("failed to write page {page} to {path:?}: {reason}")]
    Write {
        page: usize,
        path: PathBuf,
        reason: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SplitError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whole-run failures; everything else is isolated to one page.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
