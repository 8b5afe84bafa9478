use std::path::Path;

use ndarray::Array3;
use nifti::{NiftiHeader, NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};
use tracing::debug;

use crate::error::{BananaError, Result};
use crate::volume::{Affine, Volume, VoxelSpacing};

/// Read a `.nii` / `.nii.gz` file into a (depth, rows, cols) volume.
///
/// NIfTI stores voxels x-fastest as (W, H, Z); the volume is permuted so the
/// slice axis comes first. Scaling slope/intercept are applied on read.
/// A trailing singleton time axis is accepted.
pub fn read_nifti(path: &Path) -> Result<Volume> {
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let volume = obj.volume();

    let dims: Vec<usize> = volume.dim().iter().map(|&d| d as usize).collect();
    let (w, h, d) = match dims.as_slice() {
        [w, h, d] => (*w, *h, *d),
        [w, h, d, 1] => (*w, *h, *d),
        _ => return Err(BananaError::InvalidShape { shape: dims }),
    };
    if w == 0 || h == 0 || d == 0 {
        return Err(BananaError::InvalidShape { shape: dims });
    }

    let mut coords = vec![0u16; dims.len()];
    let mut values = Vec::with_capacity(w * h * d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                coords[0] = x as u16;
                coords[1] = y as u16;
                coords[2] = z as u16;
                values.push(volume.get_f32(&coords)?);
            }
        }
    }

    let data = Array3::from_shape_vec((d, h, w), values).map_err(|_| {
        BananaError::InvalidShape {
            shape: vec![d, h, w],
        }
    })?;
    let spacing = spacing_from_header(&header);
    debug!(depth = d, rows = h, cols = w, ?spacing, "Read NIfTI volume");

    let volume = Volume::new(data)?.with_spacing(spacing);
    Ok(match affine_from_header(&header) {
        Some(affine) => volume.with_affine(affine),
        None => volume,
    })
}

/// The sform rows, when the header declares one.
pub fn affine_from_header(header: &NiftiHeader) -> Option<Affine> {
    (header.sform_code > 0).then(|| [header.srow_x, header.srow_y, header.srow_z])
}

/// Voxel size from the sform matrix when present, else from `pixdim`.
pub fn spacing_from_header(header: &NiftiHeader) -> VoxelSpacing {
    let [col, row, depth] = if header.sform_code > 0 {
        let column_norm = |i: usize| {
            let (x, y, z) = (header.srow_x[i], header.srow_y[i], header.srow_z[i]);
            ((x * x + y * y + z * z) as f64).sqrt()
        };
        [column_norm(0), column_norm(1), column_norm(2)]
    } else {
        [
            header.pixdim[1] as f64,
            header.pixdim[2] as f64,
            header.pixdim[3] as f64,
        ]
    };
    VoxelSpacing::new(sane(depth), sane(row), sane(col))
}

fn sane(mm: f64) -> f64 {
    if mm.is_finite() && mm > 0.0 {
        mm
    } else {
        1.0
    }
}
