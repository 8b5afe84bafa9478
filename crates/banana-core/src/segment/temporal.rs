use ndarray::{Array3, Axis, Zip};

use crate::consts::{TEMPORAL_MIN_DEPTH, TEMPORAL_VOTE_MIN};

/// Majority vote across neighbouring slices.
///
/// A voxel is set iff at least [`TEMPORAL_VOTE_MIN`] of {previous, current,
/// next} slice are set at that position. The first and last slice are their
/// own missing neighbour (edge replication). Stacks shallower than
/// [`TEMPORAL_MIN_DEPTH`] are returned unchanged.
pub fn temporal_vote(mask: &Array3<u8>) -> Array3<u8> {
    let depth = mask.dim().0;
    if depth < TEMPORAL_MIN_DEPTH {
        return mask.clone();
    }

    let mut out = Array3::<u8>::zeros(mask.dim());
    for (z, dst) in out.outer_iter_mut().enumerate() {
        let prev = mask.index_axis(Axis(0), z.saturating_sub(1));
        let cur = mask.index_axis(Axis(0), z);
        let next = mask.index_axis(Axis(0), (z + 1).min(depth - 1));

        Zip::from(dst)
            .and(prev)
            .and(cur)
            .and(next)
            .for_each(|o, &p, &c, &n| {
                let votes = (p != 0) as u8 + (c != 0) as u8 + (n != 0) as u8;
                *o = (votes >= TEMPORAL_VOTE_MIN) as u8;
            });
    }
    out
}
