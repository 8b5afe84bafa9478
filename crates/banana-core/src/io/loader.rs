use std::path::Path;

use tracing::info;

use crate::error::{BananaError, Result};
use crate::volume::{SourceFormat, SourceInfo, Volume};

use super::archive::{extract_zip, find_series_dir};
use super::dicom::read_dicom_series;
use super::nifti_reader::read_nifti;

/// A volume together with where it came from.
#[derive(Clone, Debug)]
pub struct LoadedVolume {
    pub volume: Volume,
    pub info: SourceInfo,
}

/// Load a CT volume from a NIfTI file, a DICOM series directory or a zip
/// archive holding a DICOM series.
pub fn load_volume(path: &Path) -> Result<LoadedVolume> {
    if !path.exists() {
        return Err(BananaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let (volume, format, file_count) = if is_nifti_path(path) {
        (read_nifti(path)?, SourceFormat::Nifti, 1)
    } else if path.is_dir() {
        let (volume, count) = read_dicom_series(path)?;
        (volume, SourceFormat::DicomDirectory, count)
    } else if has_extension(path, "zip") {
        // The extracted files live until `extracted` is dropped.
        let extracted = extract_zip(path)?;
        let series_dir = find_series_dir(extracted.path());
        let (volume, count) = read_dicom_series(&series_dir)?;
        (volume, SourceFormat::DicomZip, count)
    } else {
        return Err(BananaError::UnsupportedInput(format!(
            "{} is not a .nii/.nii.gz file, a DICOM directory or a .zip archive",
            path.display()
        )));
    };

    let (d, h, w) = volume.shape();
    info!(
        format = %format,
        depth = d,
        rows = h,
        cols = w,
        voxel_mm3 = volume.voxel_volume_mm3(),
        "Loaded volume"
    );

    Ok(LoadedVolume {
        volume,
        info: SourceInfo {
            path: path.to_path_buf(),
            format,
            file_count,
        },
    })
}

/// `.nii` or `.nii.gz`, case-insensitive.
pub fn is_nifti_path(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    path.is_file() && (name.ends_with(".nii") || name.ends_with(".nii.gz"))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
