/// Default HU window `(lo, hi)` used to normalize intensities into [0, 1].
pub const DEFAULT_HU_WINDOW: (f32, f32) = (-200.0, 400.0);

/// Default inclusive HU range of the soft-tissue gate.
pub const DEFAULT_SOFT_MASK_HU: (f32, f32) = (-250.0, 200.0);

/// Default fraction of gated intensities kept above the threshold.
pub const DEFAULT_TOP_PERCENT: f32 = 0.6;

/// Default depth smoothing width. 1 disables smoothing.
pub const DEFAULT_Z_SMOOTH_K: usize = 1;

/// Default minimum 4-connected component area (pixels) kept per slice.
pub const DEFAULT_MIN_AREA: usize = 80;

/// Threshold used when no voxel passes the soft-tissue gate.
pub const EMPTY_CANDIDATE_THRESHOLD: f32 = 0.98;

/// Lower clamp for the percentile threshold (normalized units).
pub const THRESHOLD_CLAMP_MIN: f32 = 0.50;

/// Upper clamp for the percentile threshold (normalized units).
pub const THRESHOLD_CLAMP_MAX: f32 = 0.995;

/// Added to the window width when normalizing, so a zero-width window cannot divide by zero.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Minimum number of set voxels among {previous, current, next} slice for a voxel to survive.
pub const TEMPORAL_VOTE_MIN: u8 = 2;

/// Number of slices needed before the temporal vote has a full window.
pub const TEMPORAL_MIN_DEPTH: usize = 3;

/// Blend factor of the red mask overlay.
pub const OVERLAY_ALPHA: f32 = 0.35;

/// Minimum slice count to prune slices in parallel with Rayon.
pub const PARALLEL_SLICE_THRESHOLD: usize = 4;

/// Minimum pixel count (rows * cols) per slice to prune slices in parallel.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 4_096;

/// Cubic millimetres per millilitre.
pub const MM3_PER_ML: f64 = 1000.0;

/// Timestamp format used in artifact prefixes.
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
