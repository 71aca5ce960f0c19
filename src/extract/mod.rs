//! Document-text extraction.
//!
//! Turns an uploaded document into plain text for a generation prompt. The
//! declared MIME type decides the reader; anything else is unsupported.

mod office;
mod tabular;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read Word document: {0}")]
    Docx(String),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Extract plain text from `bytes` according to `mime_type`.
pub fn extract_text(mime_type: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let mime = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    debug!("Extracting {} bytes as {}", bytes.len(), mime);

    match mime.as_str() {
        MIME_TEXT => Ok(String::from_utf8_lossy(bytes).into_owned()),
        MIME_PDF => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        MIME_DOCX => office::docx_text(bytes),
        MIME_CSV => Ok(tabular::csv_text(&String::from_utf8_lossy(bytes))),
        MIME_XLS | MIME_XLSX => tabular::spreadsheet_text(bytes),
        _ => Err(ExtractError::Unsupported(mime_type.to_string())),
    }
}

/// Like [`extract_text`], but failures are logged and read as empty text.
pub fn extract_text_or_empty(mime_type: &str, bytes: &[u8]) -> String {
    extract_text(mime_type, bytes).unwrap_or_else(|e| {
        warn!("{}", e);
        String::new()
    })
}

/// Guess a MIME type from a file extension.
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" | "md" | "text" => Some(MIME_TEXT),
        "pdf" => Some(MIME_PDF),
        "docx" => Some(MIME_DOCX),
        "csv" => Some(MIME_CSV),
        "xls" => Some(MIME_XLS),
        "xlsx" => Some(MIME_XLSX),
        _ => None,
    }
}
