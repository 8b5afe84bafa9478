use std::path::PathBuf;

use ndarray::{Array3, ArrayD, Ix3};
use serde::{Deserialize, Serialize};

use crate::error::{BananaError, Result};

/// Physical voxel size in millimetres, in (depth, row, col) order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelSpacing {
    pub depth: f64,
    pub row: f64,
    pub col: f64,
}

impl VoxelSpacing {
    pub fn new(depth: f64, row: f64, col: f64) -> Self {
        Self { depth, row, col }
    }

    /// Volume of one voxel in mm³.
    pub fn voxel_volume_mm3(&self) -> f64 {
        (self.depth * self.row * self.col).abs()
    }
}

impl Default for VoxelSpacing {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Voxel-to-world transform as the NIfTI `srow_x`, `srow_y`, `srow_z` rows.
/// Voxel coordinates are ordered (col, row, depth).
pub type Affine = [[f32; 4]; 3];

/// A CT volume in Hounsfield Units, indexed (depth, row, col).
///
/// Every dimension is at least 1. Without spacing metadata each voxel
/// counts as 1 mm³.
#[derive(Clone, Debug)]
pub struct Volume {
    pub data: Array3<f32>,
    pub spacing: Option<VoxelSpacing>,
    /// Source orientation, kept so derived images overlay the input.
    pub affine: Option<Affine>,
}

impl Volume {
    /// Wrap a 3D array, rejecting empty dimensions.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        check_shape(data.shape())?;
        Ok(Self {
            data,
            spacing: None,
            affine: None,
        })
    }

    /// Wrap a dynamically-shaped array. Anything that is not exactly 3D is rejected.
    pub fn from_dyn(data: ArrayD<f32>) -> Result<Self> {
        let shape = data.shape().to_vec();
        check_shape(&shape)?;
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| BananaError::InvalidShape { shape })?;
        Ok(Self {
            data,
            spacing: None,
            affine: None,
        })
    }

    pub fn with_spacing(mut self, spacing: VoxelSpacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_affine(mut self, affine: Affine) -> Self {
        self.affine = Some(affine);
        self
    }

    /// (depth, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn depth(&self) -> usize {
        self.data.dim().0
    }

    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Voxel volume in mm³, 1.0 when spacing is unknown.
    pub fn voxel_volume_mm3(&self) -> f64 {
        self.spacing
            .map(|s| s.voxel_volume_mm3())
            .unwrap_or(1.0)
    }

    /// Minimum and maximum finite HU value.
    pub fn hu_range(&self) -> (f32, f32) {
        self.data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Shape precondition shared by every entry point taking raw arrays.
pub(crate) fn check_shape(shape: &[usize]) -> Result<()> {
    if shape.len() != 3 || shape.iter().any(|&d| d == 0) {
        return Err(BananaError::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Container the volume was read from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SourceFormat {
    Nifti,
    DicomDirectory,
    DicomZip,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nifti => write!(f, "NIfTI"),
            Self::DicomDirectory => write!(f, "DICOM series"),
            Self::DicomZip => write!(f, "Zipped DICOM series"),
        }
    }
}

/// Metadata about the loaded source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Number of files the volume was assembled from (1 for NIfTI).
    pub file_count: usize,
}
