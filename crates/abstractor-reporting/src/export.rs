use std::path::Path;
use std::str::FromStr;

use crate::ExportError;
use crate::table::{COLUMNS, WorkTable};
use crate::xlsx::write_xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Xlsx,
            ExportFormat::Csv,
            ExportFormat::Json,
            ExportFormat::Markdown,
            ExportFormat::Text,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Xlsx => "Excel",
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// Infer the format from an output path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write `table` to `path` in `format`.
pub fn export_table(table: &WorkTable, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
    let content = render(table, format)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), format = %format, rows = table.len(), "exported table");
    Ok(())
}

/// Serialize `table` in `format` without touching the filesystem.
pub fn render(table: &WorkTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Xlsx => write_xlsx(table),
        ExportFormat::Csv => Ok(export_csv(table).into_bytes()),
        ExportFormat::Json => export_json(table).map(String::into_bytes),
        ExportFormat::Markdown => Ok(export_markdown(table).into_bytes()),
        ExportFormat::Text => Ok(export_text(table).into_bytes()),
    }
}

pub fn export_json(table: &WorkTable) -> Result<String, ExportError> {
    let mut out = serde_json::to_string_pretty(table)?;
    out.push('\n');
    Ok(out)
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn export_csv(table: &WorkTable) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

pub fn export_markdown(table: &WorkTable) -> String {
    let mut out = String::from("# Abstracts\n\n");
    out.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(COLUMNS.len())));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|c| md_escape(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// Column-aligned table for terminals. Widths are measured in characters.
pub fn export_text(table: &WorkTable) -> String {
    let rows: Vec<[String; 4]> = table.rows().collect();
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_text_row(&mut out, &COLUMNS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_text_row(&mut out, row, &widths);
    }
    out
}

fn push_text_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use abstractor_core::WorkRecord;

    fn record(seq: &str, title: &str, presenter: &str, coauthors: &[&str]) -> WorkRecord {
        WorkRecord {
            sequence: seq.into(),
            document_index: 0,
            title: title.into(),
            presenter: presenter.into(),
            coauthors: coauthors.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn table() -> WorkTable {
        vec![
            record("01", "Title of the Work", "Jane Doe", &["John Smith", "Ana Souza"]),
            record("03", "Pipes | and \"quotes\"", "", &[]),
        ]
        .into()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "html".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out/abstracts.XLSX")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(Path::new("a.md")), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_path(Path::new("abstracts")), None);
        assert_eq!(ExportFormat::from_path(Path::new("a.pdf")), None);
    }

    #[test]
    fn test_every_format_round_trips_its_extension() {
        for f in ExportFormat::all() {
            assert_eq!(f.extension().parse::<ExportFormat>().unwrap(), *f);
        }
    }

    #[test]
    fn test_csv() {
        let csv = export_csv(&table());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Sequence,Title,Presenter,Co-authors");
        assert_eq!(lines[1], "01,Title of the Work,Jane Doe,\"John Smith, Ana Souza\"");
        assert_eq!(lines[2], "03,\"Pipes | and \"\"quotes\"\"\",,");
    }

    #[test]
    fn test_json() {
        let json = export_json(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["sequence"], "01");
        assert_eq!(value[0]["coauthors"][1], "Ana Souza");
        assert_eq!(value[1]["presenter"], "");
        assert!(value[0].get("document_index").is_none());
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let md = export_markdown(&table());
        assert!(md.contains("| Sequence | Title | Presenter | Co-authors |"));
        assert!(md.contains("|---|---|---|---|"));
        assert!(md.contains("| 03 | Pipes \\| and \"quotes\" |  |  |"));
    }

    #[test]
    fn test_text_alignment() {
        let table: WorkTable = vec![record("01", "Nanopartículas", "Ana", &["Bo"])].into();
        let text = export_text(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sequence  Title           Presenter  Co-authors");
        assert_eq!(lines[1], "--------  --------------  ---------  ----------");
        assert_eq!(lines[2], "01        Nanopartículas  Ana        Bo");
    }

    #[test]
    fn test_export_table_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abstracts.csv");
        export_table(&table(), ExportFormat::Csv, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Sequence,Title"));
    }

    #[test]
    fn test_export_table_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("abstracts.csv");
        let result = export_table(&table(), ExportFormat::Csv, &path);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
