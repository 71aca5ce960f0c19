use std::io::{Cursor, Write};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;
use crate::automation::COMBINED_KEY;
use crate::splitter::GeneratedFileSet;

/// Download name for the archive of one result key.
pub fn archive_name(key: &str) -> String {
    if key == COMBINED_KEY {
        "CombinedTestSuite.zip".to_string()
    } else {
        format!("{}_automation.zip", key)
    }
}

/// Zip every usable file of `files`, one deflated entry per path.
///
/// Entries with an empty path are skipped. A set with no usable file is
/// an error.
pub fn write_archive(files: &GeneratedFileSet) -> Result<Vec<u8>, ExportError> {
    if files.usable_count() == 0 {
        return Err(ExportError::Empty("no generated files".to_string()));
    }
    if files.len() > files.usable_count() {
        warn!(
            "Skipping {} generated file(s) without a path",
            files.len() - files.usable_count()
        );
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (path, content) in files.usable_files() {
        debug!("Adding {} ({} bytes)", path, content.len());
        writer.start_file(path, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}
