//! Minimal SpreadsheetML writer: one worksheet, inline-string cells, no
//! styling. Enough for Excel and LibreOffice to open without repair.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::ExportError;
use crate::table::{COLUMNS, WorkTable};

pub const SHEET_NAME: &str = "Abstracts";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const CONTENT_TYPES: &str = concat!(
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    r#"</Types>"#,
);

const STYLES: &str = concat!(
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
);

/// Serialize `table` as an `.xlsx` package.
pub fn write_xlsx(table: &WorkTable) -> Result<Vec<u8>, ExportError> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", format!("{}{}", XML_DECL, CONTENT_TYPES)),
        ("_rels/.rels", root_rels()),
        ("xl/workbook.xml", workbook()),
        ("xl/_rels/workbook.xml.rels", workbook_rels()),
        ("xl/styles.xml", format!(r#"{}<styleSheet xmlns="{}">{}</styleSheet>"#, XML_DECL, NS_MAIN, STYLES)),
        ("xl/worksheets/sheet1.xml", worksheet(table)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn root_rels() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_DECL, NS_PKG_REL, NS_REL
    )
}

fn workbook() -> String {
    format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECL, NS_MAIN, NS_REL, SHEET_NAME
    )
}

fn workbook_rels() -> String {
    format!(
        concat!(
            r#"{decl}<Relationships xmlns="{pkg}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/worksheet" Target="worksheets/sheet1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{rel}/styles" Target="styles.xml"/>"#,
            r#"</Relationships>"#
        ),
        decl = XML_DECL,
        pkg = NS_PKG_REL,
        rel = NS_REL
    )
}

fn worksheet(table: &WorkTable) -> String {
    let mut out = format!(r#"{}<worksheet xmlns="{}"><sheetData>"#, XML_DECL, NS_MAIN);
    write_row(&mut out, 1, COLUMNS.iter().copied());
    for (i, row) in table.rows().enumerate() {
        write_row(&mut out, i + 2, row.iter().map(String::as_str));
    }
    out.push_str("</sheetData></worksheet>");
    out
}

fn write_row<'a>(out: &mut String, row: usize, cells: impl Iterator<Item = &'a str>) {
    out.push_str(&format!(r#"<row r="{}">"#, row));
    for (col, value) in cells.enumerate() {
        out.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(col),
            row,
            escape(&xml_safe(value))
        ));
    }
    out.push_str("</row>");
}

/// `0 -> A`, `25 -> Z`, `26 -> AA`.
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Drop control characters XML 1.0 cannot carry.
fn xml_safe(s: &str) -> String {
    s.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}
