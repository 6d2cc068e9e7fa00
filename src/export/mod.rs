//! Printable output: one STL per structural piece, optionally zipped.
//!
//! Export always assembles its own frame from freshly normalized parameters.
//! Meshes are written at their local origin with the placement stripped.

mod archive;
mod stl;

use std::fs;
use std::path::{Path, PathBuf};

pub use archive::package_archive;
pub use stl::{
    HEADER_SIZE, TRIANGLE_RECORD_SIZE, ascii_stl, binary_stl, write_ascii_stl, write_binary_stl,
};

use crate::frame::{Frame, FrameError, FrameParameters, assemble_frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// A named payload ready to be written or packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("duplicate archive entry {0}")]
    DuplicateEntry(String),
    #[error("{} already exists", .0.display())]
    FileExists(PathBuf),
}

/// STL payloads for the structural pieces of an already built frame.
#[must_use]
pub fn frame_export_files(frame: &Frame, format: StlFormat) -> Vec<ExportFile> {
    frame
        .structural_pieces()
        .filter_map(|piece| {
            let name = piece.role.export_name()?;
            let solid = name.trim_end_matches(".stl");
            let bytes = match format {
                StlFormat::Binary => binary_stl(&piece.mesh, solid),
                StlFormat::Ascii => ascii_stl(&piece.mesh, solid).into_bytes(),
            };
            log::debug!("export {name}: {} bytes", bytes.len());
            Some(ExportFile::new(name, bytes))
        })
        .collect()
}

/// Assemble a frame for `params` and serialize its structural pieces.
///
/// # Errors
/// Returns [`ExportError::Frame`] if the frame cannot be built.
pub fn export_files(params: FrameParameters, format: StlFormat) -> Result<Vec<ExportFile>, ExportError> {
    let frame = assemble_frame(params)?;
    Ok(frame_export_files(&frame, format))
}

/// The full export as a zip archive.
///
/// # Errors
/// Returns [`ExportError`] if the frame cannot be built or packed.
pub fn export_archive(params: FrameParameters, format: StlFormat) -> Result<Vec<u8>, ExportError> {
    let files = export_files(params, format)?;
    let bytes = package_archive(&files)?;
    log::debug!("archive with {} entries: {} bytes", files.len(), bytes.len());
    Ok(bytes)
}

/// Write each file into `dir`, creating it if needed.
///
/// # Errors
/// Returns [`ExportError::FileExists`] when a target exists and `overwrite`
/// is false, or [`ExportError::Io`] on write failures.
pub fn write_export_dir(
    files: &[ExportFile],
    dir: &Path,
    overwrite: bool,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;

    let paths: Vec<PathBuf> = files.iter().map(|file| dir.join(&file.name)).collect();
    if !overwrite {
        if let Some(existing) = paths.iter().find(|path| path.exists()) {
            return Err(ExportError::FileExists(existing.clone()));
        }
    }

    for (file, path) in files.iter().zip(&paths) {
        fs::write(path, &file.bytes)?;
    }
    Ok(paths)
}

/// Write a single payload to `path`.
///
/// # Errors
/// Same as [`write_export_dir`].
pub fn write_file(bytes: &[u8], path: &Path, overwrite: bool) -> Result<(), ExportError> {
    if !overwrite && path.exists() {
        return Err(ExportError::FileExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameStyle;

    #[test]
    fn default_export_has_the_four_rails() {
        let files = export_files(FrameParameters::default(), StlFormat::Binary).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["top.stl", "bottom.stl", "left.stl", "right.stl"]);
        assert!(files.iter().all(|f| f.bytes.len() > HEADER_SIZE + 4));
    }

    #[test]
    fn bold_export_adds_the_corner_inserts() {
        let params = FrameParameters {
            style: FrameStyle::Bold,
            ..FrameParameters::default()
        };
        let files = export_files(params, StlFormat::Ascii).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "top.stl",
                "bottom.stl",
                "left.stl",
                "right.stl",
                "corner_bottom_left.stl",
                "corner_bottom_right.stl",
                "corner_top_left.stl",
                "corner_top_right.stl",
            ]
        );
        assert!(files[4].bytes.starts_with(b"solid corner_bottom_left"));
    }

    #[test]
    fn export_ignores_unnormalized_input() {
        let params = FrameParameters {
            width: f64::NAN,
            lip_width: 99.0,
            ..FrameParameters::default()
        };
        let a = export_files(params, StlFormat::Binary).unwrap();
        let b = export_files(params.normalized(), StlFormat::Binary).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn export_dir_refuses_to_clobber() {
        let dir = std::env::temp_dir().join(format!("frame-engine-export-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let files = vec![ExportFile::new("top.stl", vec![1, 2, 3])];

        let paths = write_export_dir(&files, &dir, false).unwrap();
        assert_eq!(fs::read(&paths[0]).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            write_export_dir(&files, &dir, false),
            Err(ExportError::FileExists(_))
        ));
        assert!(write_export_dir(&files, &dir, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }
}
