use thiserror::Error;

pub mod export;
pub mod table;
pub mod xlsx;

pub use export::{ExportFormat, export_table, render};
pub use table::{COLUMNS, WorkTable};
pub use xlsx::SHEET_NAME;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("unknown export format: {0:?} (expected xlsx, csv, json, md or txt)")]
    UnknownFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build spreadsheet package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
