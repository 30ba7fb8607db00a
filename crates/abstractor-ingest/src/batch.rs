use std::path::{Path, PathBuf};

use abstractor_core::{DocumentFormat, LineSequence};
use abstractor_parsing::{AbstractExtractor, SegmenterConfig};

use crate::sources::LineSources;
use crate::{
    BatchOutcome, DocumentFailure, IngestError, InputDocument, ProgressEvent, SkipReason,
    SkippedDocument,
};

/// One slot of the batch. Unreadable inputs keep their index so later
/// documents are numbered as if every input had been read.
enum Entry<'a> {
    Document(&'a InputDocument),
    Unreadable { filename: String, message: String },
}

impl Entry<'_> {
    fn filename(&self) -> &str {
        match self {
            Entry::Document(doc) => &doc.filename,
            Entry::Unreadable { filename, .. } => filename,
        }
    }
}

/// Process a batch of in-memory documents, in order, one at a time.
///
/// Each document is written into a temporary staging directory, handed to
/// the [`LineSource`](abstractor_core::LineSource) registered for its
/// format, then segmented. Unsupported formats and documents without a
/// title line are skipped; adapter failures are collected and the batch
/// moves on. The staging directory is removed before this returns, on
/// every path.
///
/// The only error is failing to create the staging directory.
pub fn process_batch(
    documents: &[InputDocument],
    config: &SegmenterConfig,
    sources: &LineSources,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<BatchOutcome, IngestError> {
    let entries = documents.iter().map(Entry::Document).collect();
    run(entries, config, sources, on_progress)
}

/// Like [`process_batch`], reading each file from disk first.
///
/// Files with an unsupported extension are never read. A file that cannot
/// be read becomes a [`DocumentFailure`] for its index only.
pub fn process_paths(
    paths: &[PathBuf],
    config: &SegmenterConfig,
    sources: &LineSources,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<BatchOutcome, IngestError> {
    let loaded: Vec<Result<InputDocument, (String, String)>> = paths
        .iter()
        .map(|path| {
            let filename = display_name(path);
            if DocumentFormat::from_filename(&filename).is_none() {
                return Ok(InputDocument::new(filename, Vec::new()));
            }
            std::fs::read(path)
                .map(|bytes| InputDocument::new(filename.clone(), bytes))
                .map_err(|e| (filename, format!("failed to read {}: {}", path.display(), e)))
        })
        .collect();

    let entries = loaded
        .iter()
        .map(|item| match item {
            Ok(doc) => Entry::Document(doc),
            Err((filename, message)) => Entry::Unreadable {
                filename: filename.clone(),
                message: message.clone(),
            },
        })
        .collect();
    run(entries, config, sources, on_progress)
}

fn run(
    entries: Vec<Entry<'_>>,
    config: &SegmenterConfig,
    sources: &LineSources,
    mut on_progress: impl FnMut(ProgressEvent),
) -> Result<BatchOutcome, IngestError> {
    let total = entries.len();
    let staging = tempfile::Builder::new()
        .prefix("abstractor-")
        .tempdir()
        .map_err(IngestError::Staging)?;
    let extractor = AbstractExtractor::with_config(config.clone());

    tracing::info!(total, staging = %staging.path().display(), "batch started");
    on_progress(ProgressEvent::Started { total });

    let mut outcome = BatchOutcome::default();

    for (index, entry) in entries.iter().enumerate() {
        let filename = entry.filename().to_string();

        let doc = match entry {
            Entry::Document(doc) => *doc,
            Entry::Unreadable { message, .. } => {
                fail(&mut outcome, &mut on_progress, index, total, filename, message.clone());
                continue;
            }
        };

        let Some(format) = DocumentFormat::from_filename(&doc.filename) else {
            tracing::debug!(index, filename = %filename, "unsupported format, skipping");
            skip(&mut outcome, &mut on_progress, index, total, filename, SkipReason::UnsupportedFormat);
            continue;
        };

        let Some(source) = sources.get(format) else {
            let message = format!("no line source registered for {} documents", format);
            fail(&mut outcome, &mut on_progress, index, total, filename, message);
            continue;
        };

        let staged = staging.path().join(staged_name(index, &doc.filename, format));
        if let Err(e) = std::fs::write(&staged, &doc.bytes) {
            let message = format!("failed to stage document: {}", e);
            fail(&mut outcome, &mut on_progress, index, total, filename, message);
            continue;
        }

        let lines = match source.extract_lines(&staged) {
            Ok(lines) => lines,
            Err(e) => {
                fail(&mut outcome, &mut on_progress, index, total, filename, e.to_string());
                continue;
            }
        };
        tracing::debug!(index, filename = %filename, lines = lines.len(), "extracted lines");

        match extractor.extract(index, &LineSequence::new(lines)) {
            Some(record) => {
                on_progress(ProgressEvent::Extracted {
                    index,
                    total,
                    filename,
                    sequence: record.sequence.clone(),
                });
                outcome.records.push(record);
            }
            None => {
                tracing::debug!(index, filename = %filename, "no title line, skipping");
                skip(&mut outcome, &mut on_progress, index, total, filename, SkipReason::NoTitle);
            }
        }
    }

    if let Err(e) = staging.close() {
        tracing::warn!(error = %e, "failed to remove staging directory");
    }

    tracing::info!(
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        failures = outcome.failures.len(),
        "batch finished"
    );
    on_progress(ProgressEvent::Finished {
        records: outcome.records.len(),
        skipped: outcome.skipped.len(),
        failures: outcome.failures.len(),
    });

    Ok(outcome)
}

fn skip(
    outcome: &mut BatchOutcome,
    on_progress: &mut impl FnMut(ProgressEvent),
    index: usize,
    total: usize,
    filename: String,
    reason: SkipReason,
) {
    on_progress(ProgressEvent::Skipped {
        index,
        total,
        filename: filename.clone(),
        reason,
    });
    outcome.skipped.push(SkippedDocument {
        document_index: index,
        filename,
        reason,
    });
}

fn fail(
    outcome: &mut BatchOutcome,
    on_progress: &mut impl FnMut(ProgressEvent),
    index: usize,
    total: usize,
    filename: String,
    message: String,
) {
    tracing::warn!(index, filename = %filename, error = %message, "document failed");
    on_progress(ProgressEvent::Failed {
        index,
        total,
        filename: filename.clone(),
        message: message.clone(),
    });
    outcome.failures.push(DocumentFailure {
        document_index: index,
        filename,
        message,
    });
}

/// `<index>_<basename>`, so two inputs with the same name never collide
/// and a name carrying directory parts cannot escape the staging directory.
pub(crate) fn staged_name(index: usize, filename: &str, format: DocumentFormat) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("document.{}", format.extension()));
    format!("{}_{}", index, base)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
