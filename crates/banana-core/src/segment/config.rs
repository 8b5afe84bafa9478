use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HU_WINDOW, DEFAULT_MIN_AREA, DEFAULT_SOFT_MASK_HU, DEFAULT_TOP_PERCENT,
    DEFAULT_Z_SMOOTH_K,
};
use crate::error::{BananaError, Result};

/// Inclusive HU interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HuRange {
    pub lo: f32,
    pub hi: f32,
}

impl HuRange {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, hu: f32) -> bool {
        hu >= self.lo && hu <= self.hi
    }
}

impl From<(f32, f32)> for HuRange {
    fn from((lo, hi): (f32, f32)) -> Self {
        Self::new(lo, hi)
    }
}

impl std::fmt::Display for HuRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}] HU", self.lo, self.hi)
    }
}

/// Parameters of the silver-standard segmentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// HU window mapped onto the normalized [0, 1] scoremap.
    #[serde(default = "default_hu_window")]
    pub hu_window: HuRange,
    /// Raw HU range a voxel must fall in to be a candidate.
    #[serde(default = "default_soft_mask_hu")]
    pub soft_mask_hu: HuRange,
    /// Fraction (0, 1] of gated scoremap values at or above the threshold.
    #[serde(default = "default_top_percent")]
    pub top_percent: f32,
    /// Width of the moving average applied along depth before thresholding.
    #[serde(default = "default_z_smooth_k")]
    pub z_smooth_k: usize,
    /// Components smaller than this (pixels, per slice) are removed. 0 disables pruning.
    #[serde(default = "default_min_area")]
    pub min_area: usize,
}

fn default_hu_window() -> HuRange {
    DEFAULT_HU_WINDOW.into()
}
fn default_soft_mask_hu() -> HuRange {
    DEFAULT_SOFT_MASK_HU.into()
}
fn default_top_percent() -> f32 {
    DEFAULT_TOP_PERCENT
}
fn default_z_smooth_k() -> usize {
    DEFAULT_Z_SMOOTH_K
}
fn default_min_area() -> usize {
    DEFAULT_MIN_AREA
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            hu_window: default_hu_window(),
            soft_mask_hu: default_soft_mask_hu(),
            top_percent: DEFAULT_TOP_PERCENT,
            z_smooth_k: DEFAULT_Z_SMOOTH_K,
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl SegmentationConfig {
    /// Reject parameter combinations that cannot describe a usable window.
    ///
    /// `produce_mask` itself never calls this; it tolerates any values.
    pub fn validate(&self) -> Result<()> {
        let HuRange { lo, hi } = self.hu_window;
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return Err(BananaError::InvalidConfig(format!(
                "hu_window must satisfy lo < hi, got {}",
                self.hu_window
            )));
        }
        let HuRange { lo, hi } = self.soft_mask_hu;
        if lo.is_nan() || hi.is_nan() || hi < lo {
            return Err(BananaError::InvalidConfig(format!(
                "soft_mask_hu must satisfy lo <= hi, got {}",
                self.soft_mask_hu
            )));
        }
        if !self.top_percent.is_finite() {
            return Err(BananaError::InvalidConfig(format!(
                "top_percent must be finite, got {}",
                self.top_percent
            )));
        }
        Ok(())
    }
}
