use crate::consts::{EMPTY_CANDIDATE_THRESHOLD, THRESHOLD_CLAMP_MAX, THRESHOLD_CLAMP_MIN};

/// Percentile `q` (in [0, 100]) with linear interpolation between closest ranks.
///
/// `q` outside [0, 100] is clamped. Non-finite values are ignored.
/// Returns `None` when no finite value remains.
pub fn percentile(values: &[f32], q: f32) -> Option<f32> {
    let mut finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n == 0 {
        return None;
    }

    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 100.0) as f64 };
    let rank = q / 100.0 * (n - 1) as f64;
    let lo = (rank.floor() as usize).min(n - 1);
    let frac = rank - lo as f64;

    let (_, lo_val, upper) = finite.select_nth_unstable_by(lo, |a, b| a.total_cmp(b));
    let lo_val = *lo_val as f64;
    if frac <= 0.0 || upper.is_empty() {
        return Some(lo_val as f32);
    }
    // The next order statistic is the smallest value right of the pivot.
    let hi_val = upper.iter().copied().fold(f32::INFINITY, f32::min) as f64;
    Some((lo_val + (hi_val - lo_val) * frac) as f32)
}

/// Unclamped threshold keeping the top `top_percent` fraction of `candidates`.
pub fn raw_threshold(candidates: &[f32], top_percent: f32) -> Option<f32> {
    percentile(candidates, 100.0 - top_percent * 100.0)
}

/// Threshold on the normalized scale for the gated `candidates`.
///
/// Falls back to [`EMPTY_CANDIDATE_THRESHOLD`] when there are no candidates,
/// otherwise clamps the percentile into
/// [[`THRESHOLD_CLAMP_MIN`], [`THRESHOLD_CLAMP_MAX`]].
pub fn compute_threshold(candidates: &[f32], top_percent: f32) -> f32 {
    match raw_threshold(candidates, top_percent) {
        Some(th) => clamp_threshold(th),
        None => EMPTY_CANDIDATE_THRESHOLD,
    }
}

fn clamp_threshold(th: f32) -> f32 {
    th.max(THRESHOLD_CLAMP_MIN).min(THRESHOLD_CLAMP_MAX)
}
