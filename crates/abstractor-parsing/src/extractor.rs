use abstractor_core::{AuthorList, AuthorToken, LineSequence, WorkRecord};

use crate::authors::AuthorParser;
use crate::config::SegmenterConfig;
use crate::record::build_record;
use crate::segment::{BlockSegmenter, SegmentAnalysis};

/// Everything the pipeline decided about one document, for dry runs.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub segment: SegmentAnalysis,
    pub title: String,
    pub authors_text: String,
    pub tokens: Vec<AuthorToken>,
    pub authors: AuthorList,
}

/// Configurable line-to-record extractor.
///
/// Holds a [`SegmenterConfig`] and runs segmentation, author parsing and
/// record building over one [`LineSequence`] at a time. Stateless between
/// documents, so the same input always yields the same record.
pub struct AbstractExtractor {
    config: SegmenterConfig,
    segmenter: BlockSegmenter,
    parser: AuthorParser,
}

impl Default for AbstractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AbstractExtractor {
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        let segmenter = BlockSegmenter::new(&config);
        let parser = AuthorParser::new(&config);
        Self {
            config,
            segmenter,
            parser,
        }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &BlockSegmenter {
        &self.segmenter
    }

    /// Run the full pipeline and keep the intermediate results.
    /// Returns `None` when no line is long enough to be a title.
    pub fn analyze(&self, lines: &LineSequence) -> Option<DocumentAnalysis> {
        let segment = self.segmenter.analyze(lines)?;
        let title = segment.segmentation.title.text(lines);
        let authors_text = segment.segmentation.authors.text(lines);
        let tokens = self.parser.tokens(&authors_text);
        let authors = self.parser.parse_tokens(&tokens);

        tracing::debug!(
            tokens = tokens.len(),
            presenter = %authors.presenter,
            coauthors = authors.coauthors.len(),
            "parsed author block"
        );

        Some(DocumentAnalysis {
            segment,
            title,
            authors_text,
            tokens,
            authors,
        })
    }

    /// Build the record for the document at `document_index` in its batch.
    pub fn extract(&self, document_index: usize, lines: &LineSequence) -> Option<WorkRecord> {
        let analysis = self.analyze(lines)?;
        Some(build_record(document_index, analysis.title, analysis.authors))
    }
}
