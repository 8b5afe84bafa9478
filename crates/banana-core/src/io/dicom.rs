use std::path::{Path, PathBuf};

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject, OpenFileOptions};
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use ndarray::Array3;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{BananaError, Result};
use crate::volume::{Volume, VoxelSpacing};

/// Per-file metadata used to order the series.
#[derive(Clone, Debug)]
struct SliceMeta {
    path: PathBuf,
    instance_number: Option<i32>,
    position_z: Option<f64>,
}

impl SliceMeta {
    /// InstanceNumber first, then the z of ImagePositionPatient.
    fn sort_key(&self) -> f64 {
        self.instance_number
            .map(f64::from)
            .or(self.position_z)
            .unwrap_or(0.0)
    }
}

/// Read a DICOM series directory into a HU volume.
///
/// Files are collected recursively (`*.dcm`, or any parseable DICOM file when
/// none carry the extension), ordered by InstanceNumber / slice position,
/// decoded with the modality LUT applied and stacked along depth.
///
/// Returns the volume and the number of slices read.
pub fn read_dicom_series(dir: &Path) -> Result<(Volume, usize)> {
    let files = collect_dicom_files(dir);
    if files.is_empty() {
        return Err(BananaError::EmptySeries(dir.display().to_string()));
    }

    let mut metas: Vec<SliceMeta> = files
        .iter()
        .map(|p| read_meta(p))
        .collect::<Result<_>>()?;
    // Stable: ties keep file-name order.
    metas.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
    info!(slices = metas.len(), dir = %dir.display(), "Reading DICOM series");

    let first = header_only(&metas[0].path)?;
    let spacing = series_spacing(&first, &metas);

    let slices: Vec<(usize, usize, Vec<f32>)> = metas
        .par_iter()
        .map(|m| decode_slice(&m.path))
        .collect::<Result<_>>()?;

    let (rows, cols, _) = &slices[0];
    let (rows, cols) = (*rows, *cols);
    let mut values = Vec::with_capacity(slices.len() * rows * cols);
    for (meta, (r, c, pixels)) in metas.iter().zip(slices) {
        if r != rows || c != cols {
            return Err(BananaError::DicomSeries(format!(
                "{} is {}x{}, expected {}x{}",
                meta.path.display(),
                c,
                r,
                cols,
                rows
            )));
        }
        values.extend(pixels);
    }

    let depth = metas.len();
    let data = Array3::from_shape_vec((depth, rows, cols), values).map_err(|_| {
        BananaError::InvalidShape {
            shape: vec![depth, rows, cols],
        }
    })?;

    let mut volume = Volume::new(data)?;
    if let Some(spacing) = spacing {
        volume = volume.with_spacing(spacing);
    } else {
        warn!("No spacing metadata in DICOM series, assuming 1 mm voxels");
    }
    Ok((volume, depth))
}

pub(crate) fn has_dicom_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("dcm"))
        .unwrap_or(false)
}

fn collect_dicom_files(dir: &Path) -> Vec<PathBuf> {
    let all: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let with_ext: Vec<PathBuf> = all.iter().filter(|p| has_dicom_extension(p)).cloned().collect();
    if !with_ext.is_empty() {
        return with_ext;
    }

    // Some vendors write extension-less files: keep whatever parses.
    let parsed: Vec<PathBuf> = all.into_iter().filter(|p| header_only(p).is_ok()).collect();
    debug!(files = parsed.len(), "Using extension-less DICOM files");
    parsed
}

fn header_only(path: &Path) -> Result<DefaultDicomObject> {
    OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(path)
        .map_err(|e| BananaError::Dicom(format!("{}: {e}", path.display())))
}

fn read_meta(path: &Path) -> Result<SliceMeta> {
    let obj = header_only(path)?;
    let instance_number = obj
        .element(tags::INSTANCE_NUMBER)
        .ok()
        .and_then(|e| e.to_int::<i32>().ok());
    let position_z = multi_value(&obj, tags::IMAGE_POSITION_PATIENT)
        .and_then(|v| v.get(2).copied());
    Ok(SliceMeta {
        path: path.to_path_buf(),
        instance_number,
        position_z,
    })
}

/// Backslash-separated numeric values of an element.
fn multi_value(obj: &DefaultDicomObject, tag: Tag) -> Option<Vec<f64>> {
    obj.element(tag)
        .ok()
        .and_then(|e| e.to_str().ok())
        .map(|s| {
            s.split('\\')
                .filter_map(|v| v.trim().parse::<f64>().ok())
                .collect::<Vec<f64>>()
        })
        .filter(|v| !v.is_empty())
}

/// Row/col spacing from PixelSpacing, depth from the position step of the
/// first two slices (SliceThickness as fallback). `None` when the series
/// carries none of them.
fn series_spacing(first: &DefaultDicomObject, metas: &[SliceMeta]) -> Option<VoxelSpacing> {
    let pixel = multi_value(first, tags::PIXEL_SPACING).filter(|v| v.len() >= 2);

    let step = match metas {
        [a, b, ..] => match (a.position_z, b.position_z) {
            (Some(z0), Some(z1)) if (z1 - z0).abs() > 0.0 => Some((z1 - z0).abs()),
            _ => None,
        },
        _ => None,
    };
    let thickness = multi_value(first, tags::SLICE_THICKNESS).and_then(|v| v.first().copied());
    let depth = step.or(thickness);

    if pixel.is_none() && depth.is_none() {
        return None;
    }
    let (row, col) = pixel.map(|v| (v[0], v[1])).unwrap_or((1.0, 1.0));
    Some(VoxelSpacing::new(depth.unwrap_or(1.0), row, col))
}

/// Decode the first frame of a file into HU values (rows, cols, pixels).
fn decode_slice(path: &Path) -> Result<(usize, usize, Vec<f32>)> {
    let obj = open_file(path).map_err(|e| BananaError::Dicom(format!("{}: {e}", path.display())))?;
    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| BananaError::Dicom(format!("{}: {e}", path.display())))?;

    let rows = decoded.rows() as usize;
    let cols = decoded.columns() as usize;
    if decoded.samples_per_pixel() != 1 {
        return Err(BananaError::DicomSeries(format!(
            "{} has {} samples per pixel, expected grayscale",
            path.display(),
            decoded.samples_per_pixel()
        )));
    }

    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::Default);
    let pixels: Vec<f32> = decoded
        .to_vec_frame_with_options(0, &options)
        .map_err(|e| BananaError::Dicom(format!("{}: {e}", path.display())))?;
    if pixels.len() != rows * cols {
        return Err(BananaError::DicomSeries(format!(
            "{} decoded {} pixels for a {}x{} frame",
            path.display(),
            pixels.len(),
            cols,
            rows
        )));
    }
    Ok((rows, cols, pixels))
}
