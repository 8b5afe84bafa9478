use std::path::PathBuf;

use crate::report::Assessment;
use crate::segment::SegmentationStats;
use crate::volume::SourceInfo;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Segmenting,
    WritingVolumes,
    Rendering,
    Reporting,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading volume"),
            Self::Segmenting => write!(f, "Segmenting"),
            Self::WritingVolumes => write!(f, "Writing NIfTI volumes"),
            Self::Rendering => write!(f, "Rendering overlay"),
            Self::Reporting => write!(f, "Writing reports"),
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineArtifacts {
    pub prefix: String,
    pub source: SourceInfo,
    pub image: PathBuf,
    pub mask: PathBuf,
    pub overlay: PathBuf,
    /// Depth index actually rendered in the overlay.
    pub overlay_slice: usize,
    pub scoremap: Option<PathBuf>,
    pub report_pro: PathBuf,
    pub report_easy: PathBuf,
    pub report_json: PathBuf,
    pub report_pdf: PathBuf,
    pub stats: SegmentationStats,
    pub assessment: Assessment,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can drive progress bars, logging or any other UI feedback.
/// All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// the stage, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// Used when `run_pipeline` delegates to `run_pipeline_reported`.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
