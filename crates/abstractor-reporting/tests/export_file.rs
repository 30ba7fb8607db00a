use std::io::Read;

use abstractor_core::WorkRecord;
use abstractor_reporting::{ExportFormat, SHEET_NAME, WorkTable, export_table};

fn table() -> WorkTable {
    [
        ("01", "Title of the Work About Nanoparticles", "Jane Doe", vec!["John Smith", "Ana Souza"]),
        ("03", "A Longer Title Spanning One Line", "Maria Lopes", vec!["Carlos Pinto"]),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (seq, title, presenter, coauthors))| WorkRecord {
        sequence: seq.into(),
        document_index: i,
        title: title.into(),
        presenter: presenter.into(),
        coauthors: coauthors.into_iter().map(String::from).collect(),
    })
    .collect()
}

#[test]
fn test_xlsx_file_opens_as_package() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abstracts.xlsx");
    let format = ExportFormat::from_path(&path).unwrap();
    export_table(&table(), format, &path).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut workbook = String::new();
    archive
        .by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut workbook)
        .unwrap();
    assert!(workbook.contains(&format!(r#"name="{}""#, SHEET_NAME)));

    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    let header = sheet.find("Co-authors").unwrap();
    let first = sheet.find("Title of the Work About Nanoparticles").unwrap();
    let second = sheet.find("A Longer Title Spanning One Line").unwrap();
    assert!(header < first && first < second);
    assert!(sheet.contains(r#"<row r="3">"#));
}

#[test]
fn test_text_formats_share_rows() {
    let dir = tempfile::tempdir().unwrap();
    for format in [ExportFormat::Csv, ExportFormat::Markdown, ExportFormat::Text] {
        let path = dir.path().join(format!("abstracts.{}", format.extension()));
        export_table(&table(), format, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Maria Lopes"), "{format}");
        assert!(content.contains("Carlos Pinto"), "{format}");
    }
}
