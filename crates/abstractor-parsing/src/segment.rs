use abstractor_core::{Block, LineSequence, Role, Segmentation};

use crate::config::SegmenterConfig;
use crate::rules::{BoundaryKind, RuleSet};

/// Where and why a block stopped growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStop {
    pub kind: BoundaryKind,
    /// Index of the boundary line (not part of the block).
    pub line: usize,
}

/// Segmentation plus the decisions that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentAnalysis {
    pub title_start: usize,
    pub segmentation: Segmentation,
    /// `None` when the title ran to the end of the document.
    pub title_stop: Option<BlockStop>,
    /// `None` when the author block ran to the end of the document.
    pub authors_stop: Option<BlockStop>,
}

/// Splits a document's lines into a title block and an author block.
///
/// 1. The title starts at the first line longer than `min_title_chars`;
///    earlier lines (running headers, page numbers) are discarded.
/// 2. The title grows line by line until a title boundary rule fires.
///    The start line itself is always kept, even if it looks like authors.
/// 3. The author block starts right after the title and grows until an
///    author boundary rule fires.
#[derive(Debug, Clone)]
pub struct BlockSegmenter {
    min_title_chars: usize,
    title_rules: RuleSet,
    author_rules: RuleSet,
}

impl Default for BlockSegmenter {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default())
    }
}

impl BlockSegmenter {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            min_title_chars: config.min_title_chars,
            title_rules: RuleSet::title_boundaries(config),
            author_rules: RuleSet::author_boundaries(config),
        }
    }

    pub fn title_rules(&self) -> &RuleSet {
        &self.title_rules
    }

    pub fn author_rules(&self) -> &RuleSet {
        &self.author_rules
    }

    /// Index of the first line long enough to be a title.
    pub fn find_title_start(&self, lines: &LineSequence) -> Option<usize> {
        lines
            .iter()
            .find(|l| l.char_len() > self.min_title_chars)
            .map(|l| l.index)
    }

    /// Returns `None` when no line is long enough to start a title.
    pub fn segment(&self, lines: &LineSequence) -> Option<Segmentation> {
        self.analyze(lines).map(|a| a.segmentation)
    }

    pub fn analyze(&self, lines: &LineSequence) -> Option<SegmentAnalysis> {
        let title_start = self.find_title_start(lines)?;

        let (title_end, title_stop) = grow(lines, title_start + 1, &self.title_rules);
        let (authors_end, authors_stop) = grow(lines, title_end, &self.author_rules);

        tracing::debug!(
            title_start,
            title_end,
            authors_end,
            title_stop = title_stop.map(|s| s.kind.as_str()),
            authors_stop = authors_stop.map(|s| s.kind.as_str()),
            "segmented document"
        );

        Some(SegmentAnalysis {
            title_start,
            segmentation: Segmentation {
                title: Block::new(Role::Title, title_start..title_end),
                authors: Block::new(Role::Authors, title_end..authors_end),
            },
            title_stop,
            authors_stop,
        })
    }
}

/// Extend a block from `from` until a rule in `rules` fires. Returns the
/// exclusive end index and the stop, if any.
fn grow(lines: &LineSequence, from: usize, rules: &RuleSet) -> (usize, Option<BlockStop>) {
    for line in lines.slice(from..lines.len()) {
        if let Some(rule) = rules.first_match(line) {
            return (
                line.index,
                Some(BlockStop {
                    kind: rule.kind(),
                    line: line.index,
                }),
            );
        }
    }
    (lines.len().max(from), None)
}
