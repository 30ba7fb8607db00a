use std::path::Path;

use thiserror::Error;

pub mod batch;
pub mod sources;

pub use batch::{process_batch, process_paths};
pub use sources::LineSources;

// Re-export domain types for convenience
pub use abstractor_core::{DocumentFormat, WorkRecord};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to create staging directory: {0}")]
    Staging(#[source] std::io::Error),
}

/// One uploaded document: its original filename and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl InputDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a document from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_filename(&self.filename)
    }
}

/// Why a document produced no record without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension other than `.docx` or `.pdf`.
    UnsupportedFormat,
    /// No line longer than the title threshold.
    NoTitle,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "unsupported format",
            Self::NoTitle => "no title line",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub document_index: usize,
    pub filename: String,
    pub reason: SkipReason,
}

/// A document whose container could not be read. Other documents in the
/// batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub document_index: usize,
    pub filename: String,
    pub message: String,
}

impl std::fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.filename, self.message)
    }
}

/// Everything a batch produced. `records` are in input order and carry
/// sequence numbers derived from the original document index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub records: Vec<WorkRecord>,
    pub skipped: Vec<SkippedDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    /// Number of input documents accounted for.
    pub fn total(&self) -> usize {
        self.records.len() + self.skipped.len() + self.failures.len()
    }
}

/// Progress events emitted while a batch runs, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started {
        total: usize,
    },
    Extracted {
        index: usize,
        total: usize,
        filename: String,
        sequence: String,
    },
    Skipped {
        index: usize,
        total: usize,
        filename: String,
        reason: SkipReason,
    },
    Failed {
        index: usize,
        total: usize,
        filename: String,
        message: String,
    },
    Finished {
        records: usize,
        skipped: usize,
        failures: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_document_format_is_case_insensitive() {
        assert_eq!(
            InputDocument::new("ABSTRACT.DOCX", vec![]).format(),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(InputDocument::new("notes.txt", vec![]).format(), None);
    }

    #[test]
    fn test_failure_display() {
        let failure = DocumentFailure {
            document_index: 2,
            filename: "broken.pdf".into(),
            message: "failed to open document: bad xref".into(),
        };
        assert_eq!(failure.to_string(), "broken.pdf: failed to open document: bad xref");
    }

    #[test]
    fn test_outcome_total() {
        let outcome = BatchOutcome {
            records: vec![],
            skipped: vec![SkippedDocument {
                document_index: 0,
                filename: "a.txt".into(),
                reason: SkipReason::UnsupportedFormat,
            }],
            failures: vec![],
        };
        assert_eq!(outcome.total(), 1);
        assert_eq!(SkipReason::NoTitle.to_string(), "no title line");
    }
}
