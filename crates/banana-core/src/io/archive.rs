use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::Result;

use super::dicom::has_dicom_extension;

/// Extract a zip archive into a fresh temporary directory.
///
/// The directory is removed when the returned handle is dropped.
pub fn extract_zip(path: &Path) -> Result<TempDir> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let dir = tempfile::Builder::new().prefix("banana_").tempdir()?;
    // `extract` rejects entries that would escape the target directory.
    archive.extract(dir.path())?;
    debug!(entries = archive.len(), dir = %dir.path().display(), "Extracted archive");
    Ok(dir)
}

/// First directory under `root` (walk order) holding a `.dcm` file, or `root` itself.
pub fn find_series_dir(root: &Path) -> PathBuf {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && has_dicom_extension(e.path()))
        .and_then(|e| e.path().parent().map(Path::to_path_buf))
        .unwrap_or_else(|| root.to_path_buf())
}
