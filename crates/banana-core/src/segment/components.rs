use ndarray::{Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, PARALLEL_SLICE_THRESHOLD};

/// Label value of pixels that belong to no component.
pub const UNLABELED: i32 = -1;

/// 4-connected component labelling of one slice.
#[derive(Clone, Debug)]
pub struct ComponentLabels {
    /// `UNLABELED` for background, otherwise the component id.
    pub labels: Array2<i32>,
    /// Pixel count of each component, indexed by id.
    pub areas: Vec<usize>,
}

impl ComponentLabels {
    pub fn count(&self) -> usize {
        self.areas.len()
    }
}

/// Label the 4-connected foreground (non-zero) regions of a slice.
///
/// Iterative flood fill with an explicit stack: every foreground pixel is
/// labelled exactly once when it is pushed, so the work is O(rows * cols)
/// and deep regions cannot overflow the call stack.
pub fn label_components(mask: ArrayView2<u8>) -> ComponentLabels {
    let (h, w) = mask.dim();
    let mut labels = Array2::<i32>::from_elem((h, w), UNLABELED);
    let mut areas: Vec<usize> = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for row in 0..h {
        for col in 0..w {
            if mask[[row, col]] == 0 || labels[[row, col]] != UNLABELED {
                continue;
            }

            let id = areas.len() as i32;
            labels[[row, col]] = id;
            stack.push((row, col));
            let mut area = 0usize;

            while let Some((r, c)) = stack.pop() {
                area += 1;
                let mut visit = |nr: usize, nc: usize| {
                    if mask[[nr, nc]] != 0 && labels[[nr, nc]] == UNLABELED {
                        labels[[nr, nc]] = id;
                        stack.push((nr, nc));
                    }
                };
                if r > 0 {
                    visit(r - 1, c);
                }
                if r + 1 < h {
                    visit(r + 1, c);
                }
                if c > 0 {
                    visit(r, c - 1);
                }
                if c + 1 < w {
                    visit(r, c + 1);
                }
            }

            areas.push(area);
        }
    }

    ComponentLabels { labels, areas }
}

/// Zero every 4-connected component with fewer than `min_area` pixels.
///
/// Components of exactly `min_area` pixels are kept. The output is binary.
/// An empty slice, or `min_area == 0`, is returned unchanged.
pub fn prune_small_components(mask: ArrayView2<u8>, min_area: usize) -> Array2<u8> {
    if min_area == 0 {
        return mask.to_owned();
    }

    let components = label_components(mask);
    if components.count() == 0 {
        return mask.to_owned();
    }

    let keep: Vec<bool> = components.areas.iter().map(|&a| a >= min_area).collect();
    components
        .labels
        .mapv(|id| if id == UNLABELED { 0 } else { keep[id as usize] as u8 })
}

/// Apply [`prune_small_components`] to every depth slice independently.
///
/// Large volumes are pruned slice-parallel; the result is identical to the
/// sequential pass.
pub fn prune_slices(mask: &Array3<u8>, min_area: usize) -> Array3<u8> {
    let (d, h, w) = mask.dim();
    let parallel = d >= PARALLEL_SLICE_THRESHOLD && h * w >= PARALLEL_PIXEL_THRESHOLD;

    let slices: Vec<Array2<u8>> = if parallel {
        (0..d)
            .into_par_iter()
            .map(|z| prune_small_components(mask.index_axis(Axis(0), z), min_area))
            .collect()
    } else {
        mask.outer_iter()
            .map(|slice| prune_small_components(slice, min_area))
            .collect()
    };

    let mut out = Array3::<u8>::zeros((d, h, w));
    for (z, slice) in slices.into_iter().enumerate() {
        out.index_axis_mut(Axis(0), z).assign(&slice);
    }
    out
}
