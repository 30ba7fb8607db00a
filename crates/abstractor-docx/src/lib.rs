//! Line source for Word `.docx` files.
//!
//! A `.docx` is a ZIP package; the visible body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p><w:r><w:t>Title of the Work</w:t></w:r></w:p>
//!     <w:p>
//!       <w:r><w:t xml:space="preserve">Jane Doe</w:t></w:r>
//!       <w:r><w:t>*, John Smith</w:t><w:br/><w:t>Ana Souza</w:t></w:r>
//!     </w:p>
//!   </w:body>
//! </w:document>
//! ```
//! Each paragraph becomes one line; explicit breaks inside a paragraph
//! split it into several lines.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use abstractor_core::{BackendError, DocumentFormat, LineSource, normalize_line};

const DOCUMENT_PART: &str = "word/document.xml";

/// ZIP + XML implementation of [`LineSource`] for `.docx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxBackend;

impl DocxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LineSource for DocxBackend {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn extract_lines(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let file = File::open(path)?;
        let lines = extract_lines_from_reader(file)?;
        tracing::debug!(path = %path.display(), lines = lines.len(), "extracted DOCX lines");
        Ok(lines)
    }
}

/// Extract lines from an in-memory `.docx` package.
pub fn extract_lines_from_bytes(data: &[u8]) -> Result<Vec<String>, BackendError> {
    extract_lines_from_reader(Cursor::new(data))
}

fn extract_lines_from_reader<R: Read + Seek>(reader: R) -> Result<Vec<String>, BackendError> {
    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| BackendError::OpenError(format!("not a DOCX package: {}", e)))?;
    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| BackendError::OpenError(format!("missing {}: {}", DOCUMENT_PART, e)))?;
    parse_document_xml(BufReader::new(part))
}

/// Walk `w:p` paragraphs in body order and return their non-empty lines.
///
/// `w:t` runs are concatenated, `w:tab` becomes a space, and `w:br`/`w:cr`
/// end the current line. A paragraph nested in a text box is emitted as
/// its own line between the enclosing paragraph's text before and after it. Deleted text (`w:delText`) and field codes
/// (`w:instrText`) are not visible and are ignored.
pub fn parse_document_xml<R: BufRead>(reader: R) -> Result<Vec<String>, BackendError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                // A paragraph nested in a text box ends the enclosing
                // paragraph's text so far.
                b"p" => flush_line(&mut current, &mut lines),
                b"t" => in_text = true,
                b"tab" => current.push(' '),
                b"br" | b"cr" => flush_line(&mut current, &mut lines),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => current.push(' '),
                b"br" | b"cr" => flush_line(&mut current, &mut lines),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| BackendError::ExtractionError(err.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => flush_line(&mut current, &mut lines),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BackendError::ExtractionError(format!(
                    "malformed {} at byte {}: {}",
                    DOCUMENT_PART,
                    xml_reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    flush_line(&mut current, &mut lines);
    Ok(lines)
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = normalize_line(current);
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            paragraphs
        )
    }

    fn parse(paragraphs: &str) -> Vec<String> {
        parse_document_xml(Cursor::new(body(paragraphs))).unwrap()
    }

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let lines = parse(
            r#"<w:p><w:r><w:t>Title of the Work</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Jane Doe</w:t></w:r><w:r><w:t>*, John Smith</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["Title of the Work", "Jane Doe*, John Smith"]);
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let lines = parse(
            r#"<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p><w:p><w:r><w:t>Only line</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["Only line"]);
    }

    #[test]
    fn test_break_splits_paragraph() {
        let lines = parse(
            r#"<w:p><w:r><w:t>A Title</w:t><w:br/><w:t>Jane Doe*</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["A Title", "Jane Doe*"]);
    }

    #[test]
    fn test_tab_and_entities() {
        let lines = parse(
            r#"<w:p><w:r><w:t>Gold</w:t><w:tab/><w:t>&amp; Silver &lt;Nano&gt;</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["Gold & Silver <Nano>"]);
    }

    #[test]
    fn test_deleted_and_field_text_ignored() {
        let lines = parse(
            r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:del><w:r><w:delText>old</w:delText></w:r></w:del><w:r><w:t>kept</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["kept"]);
    }

    #[test]
    fn test_text_box_paragraph_keeps_enclosing_text() {
        let lines = parse(
            r#"<w:p><w:r><w:t>Title of the Work</w:t></w:r><w:r><w:txbxContent><w:p><w:r><w:t>Boxed note</w:t></w:r></w:p></w:txbxContent></w:r><w:r><w:t>Jane Doe*</w:t></w:r></w:p>"#,
        );
        assert_eq!(lines, vec!["Title of the Work", "Boxed note", "Jane Doe*"]);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let result = parse_document_xml(Cursor::new(
            "<w:document><w:body><w:p><w:t>x</w:p></w:body>",
        ));
        assert!(matches!(result, Err(BackendError::ExtractionError(_))));
    }

    #[test]
    fn test_extract_from_package() {
        let data = docx_bytes(&body(
            r#"<w:p><w:r><w:t>Title of the Work About Nanoparticles</w:t></w:r></w:p><w:p><w:r><w:t>Jane Doe*, John Smith</w:t></w:r></w:p>"#,
        ));
        let lines = extract_lines_from_bytes(&data).unwrap();
        assert_eq!(
            lines,
            vec!["Title of the Work About Nanoparticles", "Jane Doe*, John Smith"]
        );
    }

    #[test]
    fn test_not_a_zip() {
        let result = extract_lines_from_bytes(b"%PDF-1.7 not a docx");
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }

    #[test]
    fn test_missing_document_part() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let data = zip.finish().unwrap().into_inner();
        let result = extract_lines_from_bytes(&data);
        assert!(matches!(result, Err(BackendError::OpenError(_))));
    }

    #[test]
    fn test_backend_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abstract.docx");
        std::fs::write(
            &path,
            docx_bytes(&body(r#"<w:p><w:r><w:t>Hello Line</w:t></w:r></w:p>"#)),
        )
        .unwrap();
        let lines = DocxBackend::new().extract_lines(&path).unwrap();
        assert_eq!(lines, vec!["Hello Line"]);
        assert_eq!(DocxBackend::new().format(), DocumentFormat::Docx);
    }
}
