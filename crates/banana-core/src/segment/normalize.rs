use ndarray::{Array3, ArrayView3, Axis, Zip};

use crate::consts::NORMALIZE_EPSILON;

use super::config::HuRange;

/// Clip HU values to `window` and rescale linearly into [0, 1].
pub fn normalize_window(data: ArrayView3<f32>, window: HuRange) -> Array3<f32> {
    let HuRange { lo, hi } = window;
    let scale = hi - lo + NORMALIZE_EPSILON;
    // max/min instead of clamp: a reversed window must not panic.
    data.mapv(|v| (v.max(lo).min(hi) - lo) / scale)
}

/// Voxels whose raw HU lies inside `range` (inclusive).
pub fn soft_tissue_gate(data: ArrayView3<f32>, range: HuRange) -> Array3<bool> {
    data.mapv(|v| range.contains(v))
}

/// Moving average of width `k` along depth at every (row, col).
///
/// Edges are replicated: `k / 2` copies of the first slice before, `k - 1 - k / 2`
/// copies of the last slice after, so the output keeps the input depth.
/// `k <= 1` returns the input unchanged.
pub fn smooth_depth(scoremap: ArrayView3<f32>, k: usize) -> Array3<f32> {
    let depth = scoremap.dim().0;
    if k <= 1 || depth == 0 {
        return scoremap.to_owned();
    }

    let before = k / 2;
    let last = depth as isize - 1;
    let mut out = Array3::<f32>::zeros(scoremap.dim());

    Zip::from(out.lanes_mut(Axis(0)))
        .and(scoremap.lanes(Axis(0)))
        .for_each(|mut dst, src| {
            let padded: Vec<f64> = (0..depth + k - 1)
                .map(|i| {
                    let z = (i as isize - before as isize).clamp(0, last);
                    src[z as usize] as f64
                })
                .collect();
            for (z, value) in dst.iter_mut().enumerate() {
                let sum: f64 = padded[z..z + k].iter().sum();
                *value = (sum / k as f64) as f32;
            }
        });

    out
}
