use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{ExportError, ExportFile};

/// Pack `files` into a deflated zip, one entry per file, in the given order.
///
/// # Errors
/// Returns [`ExportError::DuplicateEntry`] when two files share a name and
/// [`ExportError::Zip`] when the writer fails.
pub fn package_archive(files: &[ExportFile]) -> Result<Vec<u8>, ExportError> {
    let mut seen = HashSet::new();
    if let Some(file) = files.iter().find(|file| !seen.insert(file.name.as_str())) {
        return Err(ExportError::DuplicateEntry(file.name.clone()));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.name.as_str(), options)?;
        zip.write_all(&file.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
