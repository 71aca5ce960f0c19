//! Packaging of generated code and test cases for download.

mod archive;
mod spreadsheet;

pub use archive::{archive_name, write_archive};
pub use spreadsheet::{write_spreadsheet, SPREADSHEET_FILE_NAME};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: {0}")]
    Empty(String),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
