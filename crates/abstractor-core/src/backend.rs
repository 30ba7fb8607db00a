use std::path::Path;

use thiserror::Error;

use crate::DocumentFormat;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors turn one document container into its visible lines in
/// reading order. Each returned line is trimmed and non-empty; no promise
/// is made about line-break fidelity across PDF columns. Block
/// segmentation and author parsing live in `abstractor_parsing`.
pub trait LineSource: Send + Sync {
    /// The container format this source understands.
    fn format(&self) -> DocumentFormat;

    /// Extract the ordered, non-empty lines of the document at `path`.
    fn extract_lines(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}
