use thiserror::Error;

pub mod authors;
pub mod config;
pub mod extractor;
pub mod record;
pub mod rules;
pub mod segment;

pub use authors::{AuthorParser, clean_author_name, split_author_tokens};
pub use config::{ListOverride, SegmenterConfig, SegmenterConfigBuilder};
pub use extractor::{AbstractExtractor, DocumentAnalysis};
pub use record::{build_record, format_sequence};
pub use rules::{BoundaryKind, BoundaryRule, RuleSet};
pub use segment::{BlockSegmenter, BlockStop, SegmentAnalysis};
// Re-export domain types from core (canonical definitions live there)
pub use abstractor_core::{AuthorList, AuthorToken, Line, LineSequence, Segmentation, WorkRecord};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid keyword pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("presenter marker must be a single non-alphanumeric character, got {0:?}")]
    InvalidMarker(String),
}

/// Extract a record from a document's lines with the default configuration.
///
/// Pipeline:
/// 1. Find the title start (first line longer than 10 characters)
/// 2. Grow the title block until a line looks like an author list
/// 3. Grow the author block until an affiliation, email, section heading,
///    list/citation marker or body text line
/// 4. Split authors on `,`/`;`, pick the `*`-marked presenter, clean names
/// 5. Number the record from `document_index`
pub fn extract_record(document_index: usize, lines: &LineSequence) -> Option<WorkRecord> {
    AbstractExtractor::new().extract(document_index, lines)
}
