use std::ops::Range;
use std::path::Path;

use serde::Serialize;

pub mod backend;
pub mod config_file;
pub mod text_utils;

// Re-export for convenience
pub use backend::{BackendError, LineSource};
pub use text_utils::{expand_ligatures, normalize_line};

/// A single trimmed line of visible text and its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub index: usize,
    pub text: String,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Ordered lines of one document, read-only once built.
///
/// Lines are trimmed on construction. Empty lines are kept so that
/// paragraph breaks survive into segmentation; line sources normally
/// never emit them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<Line>,
}

impl LineSequence {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, text)| Line {
                index,
                text: text.as_ref().trim().to_string(),
            })
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Lines inside `range`, clamped to the sequence bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Line] {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        &self.lines[start..end]
    }
}

impl<'a> IntoIterator for &'a LineSequence {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Semantic role of a block of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Title,
    Authors,
}

/// A contiguous run of lines sharing one role, held as an index range
/// into its [`LineSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub role: Role,
    pub range: Range<usize>,
}

impl Block {
    pub fn new(role: Role, range: Range<usize>) -> Self {
        Self { role, range }
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range.contains(&index)
    }

    /// Space-joined text of the block's lines.
    pub fn text(&self, lines: &LineSequence) -> String {
        lines
            .slice(self.range.clone())
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Title and author blocks found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub title: Block,
    pub authors: Block,
}

impl Segmentation {
    /// Index one past the last author line.
    pub fn author_block_end(&self) -> usize {
        self.authors.range.end
    }
}

/// A raw separator-delimited piece of the author block text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorToken {
    pub raw: String,
    pub is_presenter: bool,
}

/// Presenter plus the remaining co-authors, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorList {
    pub presenter: String,
    pub coauthors: Vec<String>,
}

impl AuthorList {
    pub fn is_empty(&self) -> bool {
        self.presenter.is_empty() && self.coauthors.is_empty()
    }
}

/// One output row per successfully segmented document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkRecord {
    /// 1-based document position, zero-padded to at least two digits.
    pub sequence: String,
    /// 0-based position of the source document in the batch.
    #[serde(skip)]
    pub document_index: usize,
    pub title: String,
    pub presenter: String,
    pub coauthors: Vec<String>,
}

impl WorkRecord {
    /// Co-authors joined for tabular output.
    pub fn coauthors_joined(&self) -> String {
        self.coauthors.join(", ")
    }
}

/// Document container formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Docx,
    Pdf,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect the format from a filename. Unknown or missing extensions yield `None`.
    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
