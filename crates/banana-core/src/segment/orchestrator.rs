use ndarray::{Array3, ArrayView3, ArrayViewD, Ix3, Zip};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BananaError, Result};
use crate::volume::{check_shape, Volume};

use super::components::prune_slices;
use super::config::SegmentationConfig;
use super::normalize::{normalize_window, smooth_depth, soft_tissue_gate};
use super::temporal::temporal_vote;
use super::threshold::compute_threshold;

/// Summary of one segmentation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationStats {
    /// (depth, rows, cols)
    pub shape: [usize; 3],
    /// Threshold on the normalized scale.
    pub threshold: f32,
    pub voxels_raw: usize,
    pub voxels_clean: usize,
    /// `voxels_clean` over the total voxel count.
    pub ratio_clean: f64,
}

/// Clean mask, scoremap and statistics of one segmentation.
#[derive(Clone, Debug)]
pub struct SegmentationOutput {
    /// Binary (0/1) mask after pruning and temporal voting.
    pub mask: Array3<u8>,
    /// Normalized (and optionally depth-smoothed) intensities in [0, 1].
    pub scoremap: Array3<f32>,
    pub stats: SegmentationStats,
}

/// Produce the silver-standard mask of a volume.
///
/// Pipeline: HU window normalization -> soft-tissue gate -> optional depth
/// smoothing -> percentile threshold over gated voxels -> raw mask ->
/// per-slice small-component pruning -> 3-slice majority vote -> stats.
pub fn produce_mask(volume: &Volume, config: &SegmentationConfig) -> SegmentationOutput {
    segment(volume.data.view(), config)
}

/// Same as [`produce_mask`] for an array of unchecked dimensionality.
///
/// Fails with [`BananaError::InvalidShape`] unless the array is 3D with no
/// empty axis; nothing else can fail.
pub fn produce_mask_dyn(
    data: ArrayViewD<f32>,
    config: &SegmentationConfig,
) -> Result<SegmentationOutput> {
    check_shape(data.shape())?;
    let shape = data.shape().to_vec();
    let data = data
        .into_dimensionality::<Ix3>()
        .map_err(|_| BananaError::InvalidShape { shape })?;
    Ok(segment(data, config))
}

fn segment(data: ArrayView3<f32>, config: &SegmentationConfig) -> SegmentationOutput {
    let (d, h, w) = data.dim();

    // Step 1: normalize into [0, 1].
    let scoremap = normalize_window(data, config.hu_window);

    // Step 2: soft-tissue gate on raw HU.
    let gate = soft_tissue_gate(data, config.soft_mask_hu);

    // Step 3: optional smoothing along depth.
    let scoremap = if config.z_smooth_k > 1 {
        smooth_depth(scoremap.view(), config.z_smooth_k)
    } else {
        scoremap
    };

    // Step 4: threshold over the gated scoremap values.
    let candidates: Vec<f32> = scoremap
        .iter()
        .zip(gate.iter())
        .filter_map(|(&v, &g)| g.then_some(v))
        .collect();
    let threshold = compute_threshold(&candidates, config.top_percent);
    debug!(
        candidates = candidates.len(),
        threshold, "Computed intensity threshold"
    );

    // Step 5: raw mask.
    let raw = Zip::from(&scoremap)
        .and(&gate)
        .map_collect(|&v, &g| (g && v >= threshold) as u8);
    let voxels_raw = count_set(&raw);

    // Step 6-7: per-slice pruning, then the cross-slice vote.
    let pruned = prune_slices(&raw, config.min_area);
    let mask = temporal_vote(&pruned);
    let voxels_clean = count_set(&mask);

    let total = d * h * w;
    let stats = SegmentationStats {
        shape: [d, h, w],
        threshold,
        voxels_raw,
        voxels_clean,
        ratio_clean: voxels_clean as f64 / total as f64,
    };
    info!(
        depth = d,
        rows = h,
        cols = w,
        threshold,
        voxels_raw,
        voxels_clean,
        "Segmentation complete"
    );

    SegmentationOutput {
        mask,
        scoremap,
        stats,
    }
}

fn count_set(mask: &Array3<u8>) -> usize {
    mask.iter().filter(|&&v| v != 0).count()
}
