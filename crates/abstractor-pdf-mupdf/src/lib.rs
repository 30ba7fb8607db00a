use std::path::Path;

use mupdf::{Document, TextPageFlags};

use abstractor_core::config_file::PdfConfig;
use abstractor_core::{BackendError, DocumentFormat, LineSource, normalize_line};

/// PDF [`LineSource`] backed by MuPDF's structured text.
///
/// Kept in its own crate so that builds of `abstractor-ingest` without the
/// `pdf` feature never link the AGPL-licensed mupdf library.
///
/// Text blocks lying entirely in the top 4% of a page (running headers such
/// as the event name) or starting in the bottom 5% (footers, page numbers)
/// are dropped, so they cannot be taken for a title line.
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// Default 0.05. `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// Default 0.04. `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            footer_exclusion_ratio: Some(0.05),
            header_exclusion_ratio: Some(0.04),
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[pdf]` config section, keeping defaults for unset values.
    pub fn from_config(config: &PdfConfig) -> Self {
        let mut backend = Self::default();
        if let Some(ratio) = config.footer_exclusion {
            backend = backend.with_footer_exclusion(ratio);
        }
        if let Some(ratio) = config.header_exclusion {
            backend = backend.with_header_exclusion(ratio);
        }
        backend
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = valid_ratio(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = valid_ratio(ratio);
        self
    }
}

fn valid_ratio(ratio: f32) -> Option<f32> {
    if ratio > 0.0 && ratio < 1.0 {
        Some(ratio)
    } else {
        None
    }
}

impl LineSource for MupdfBackend {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract_lines(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut lines = Vec::new();
        let mut skipped_blocks = 0usize;

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            // Get page bounds for header/footer exclusion
            let page_bounds = page
                .bounds()
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                // Blocks entirely within the header band
                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    skipped_blocks += 1;
                    continue;
                }
                // Blocks whose top edge is in the footer band
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    skipped_blocks += 1;
                    continue;
                }

                for line in block.lines() {
                    let raw: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    let text = normalize_line(&raw);
                    if !text.is_empty() {
                        lines.push(text);
                    }
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            lines = lines.len(),
            skipped_blocks,
            "extracted PDF lines"
        );

        Ok(lines)
    }
}
