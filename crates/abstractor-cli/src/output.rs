use std::io::Write;

use abstractor_core::LineSequence;
use abstractor_ingest::{DocumentFailure, SkippedDocument};
use abstractor_parsing::{BlockStop, DocumentAnalysis, SegmenterConfig};
use abstractor_reporting::WorkTable;
use abstractor_reporting::export::export_text;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the consolidated table, column-aligned.
pub fn print_table(w: &mut dyn Write, table: &WorkTable, color: ColorMode) -> std::io::Result<()> {
    if table.is_empty() {
        return writeln!(w, "No records extracted.");
    }

    let text = export_text(table);
    for (i, line) in text.lines().enumerate() {
        match i {
            0 if color.enabled() => writeln!(w, "{}", line.bold())?,
            1 if color.enabled() => writeln!(w, "{}", line.dimmed())?,
            _ => writeln!(w, "{}", line)?,
        }
    }
    Ok(())
}

/// Print how many documents produced records and why the rest did not.
pub fn print_summary(
    w: &mut dyn Write,
    records: usize,
    skipped: &[SkippedDocument],
    failures: &[DocumentFailure],
    color: ColorMode,
) -> std::io::Result<()> {
    let total = records + skipped.len() + failures.len();
    writeln!(w)?;
    writeln!(w, "Extracted {} of {} documents", records, total)?;

    for s in skipped {
        let label = format!("[{:02}] skipped", s.document_index + 1);
        if color.enabled() {
            writeln!(w, "  {} {} ({})", label.yellow(), s.filename, s.reason)?;
        } else {
            writeln!(w, "  {} {} ({})", label, s.filename, s.reason)?;
        }
    }
    for f in failures {
        let label = format!("[{:02}] failed", f.document_index + 1);
        if color.enabled() {
            writeln!(w, "  {} {}: {}", label.red(), f.filename, f.message.dimmed())?;
        } else {
            writeln!(w, "  {} {}: {}", label, f.filename, f.message)?;
        }
    }
    Ok(())
}

/// Role of a line in a dry run.
fn line_role(index: usize, analysis: Option<&DocumentAnalysis>) -> &'static str {
    let Some(a) = analysis else {
        return "discarded";
    };
    let seg = &a.segment.segmentation;
    if index < a.segment.title_start {
        "discarded"
    } else if seg.title.contains(index) {
        "title"
    } else if seg.authors.contains(index) {
        "authors"
    } else {
        "rest"
    }
}

fn stop_str(stop: Option<BlockStop>) -> String {
    match stop {
        Some(s) => format!("{} at line {}", s.kind, s.line + 1),
        None => "end of document".to_string(),
    }
}

/// Dry run: every line with its role, the rule that ended each block, the
/// author tokens and the record that would be produced.
pub fn print_inspection(
    w: &mut dyn Write,
    file_name: &str,
    lines: &LineSequence,
    analysis: Option<&DocumentAnalysis>,
    config: &SegmenterConfig,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} lines)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            lines.len()
        )?;
    } else {
        writeln!(w, "DRY RUN: {} ({} lines)\n", file_name, lines.len())?;
    }

    for line in lines {
        let role = line_role(line.index, analysis);
        let tag = format!("{:>4} {:<9}", line.index + 1, role);
        if !color.enabled() {
            writeln!(w, "{} {}", tag, line.text)?;
            continue;
        }
        match role {
            "title" => writeln!(w, "{} {}", tag.green(), line.text)?,
            "authors" => writeln!(w, "{} {}", tag.yellow(), line.text)?,
            _ => writeln!(w, "{} {}", tag.dimmed(), line.text.dimmed())?,
        }
    }
    writeln!(w)?;

    let Some(a) = analysis else {
        let msg = format!(
            "No line longer than {} characters; document would be skipped.",
            config.min_title_chars()
        );
        if color.enabled() {
            writeln!(w, "{}", msg.red())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
        return Ok(());
    };

    writeln!(w, "Title stopped by:   {}", stop_str(a.segment.title_stop))?;
    writeln!(w, "Authors stopped by: {}", stop_str(a.segment.authors_stop))?;
    writeln!(w)?;

    if a.tokens.is_empty() {
        writeln!(w, "Author tokens: (none)")?;
    } else {
        writeln!(w, "Author tokens:")?;
        for token in &a.tokens {
            if token.is_presenter && color.enabled() {
                writeln!(w, "  {} {}", token.raw, "(marked)".cyan())?;
            } else if token.is_presenter {
                writeln!(w, "  {} (marked)", token.raw)?;
            } else {
                writeln!(w, "  {}", token.raw)?;
            }
        }
    }
    writeln!(w)?;

    let presenter = if a.authors.presenter.is_empty() {
        "(none)"
    } else {
        a.authors.presenter.as_str()
    };
    let coauthors = if a.authors.coauthors.is_empty() {
        "(none)".to_string()
    } else {
        a.authors.coauthors.join(", ")
    };
    if color.enabled() {
        writeln!(w, "  {} {}", "Title:     ".bold(), a.title)?;
        writeln!(w, "  {} {}", "Presenter: ".bold(), presenter)?;
        writeln!(w, "  {} {}", "Co-authors:".bold(), coauthors)?;
    } else {
        writeln!(w, "  Title:      {}", a.title)?;
        writeln!(w, "  Presenter:  {}", presenter)?;
        writeln!(w, "  Co-authors: {}", coauthors)?;
    }
    Ok(())
}
