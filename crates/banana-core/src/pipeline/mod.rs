pub mod config;
pub mod orchestrator;
pub mod types;

pub use config::{artifact_prefix, case_name_from_path, PipelineConfig};
pub use orchestrator::{run_pipeline, run_pipeline_reported};
pub use types::{PipelineArtifacts, PipelineStage, ProgressReporter};
