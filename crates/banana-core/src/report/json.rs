use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::segment::{SegmentationConfig, SegmentationStats};

use super::{ArtifactNames, Assessment, ReportContext};

/// Machine-readable report written next to the text reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    pub input: String,
    pub output_dir: String,
    pub created_at: String,
    pub parameters: SegmentationConfig,
    pub stats: SegmentationStats,
    pub assessment: Assessment,
    pub artifacts: ArtifactNames,
}

impl JsonReport {
    pub fn from_context(ctx: &ReportContext<'_>) -> Self {
        Self {
            input: ctx.input.display().to_string(),
            output_dir: ctx.output_dir.display().to_string(),
            created_at: ctx.created_at.clone(),
            parameters: ctx.config.clone(),
            stats: ctx.stats.clone(),
            assessment: ctx.assessment.clone(),
            artifacts: ctx.artifacts.clone(),
        }
    }
}

/// Serialize the report as pretty-printed JSON.
pub fn write_json_report(ctx: &ReportContext<'_>, path: &Path) -> Result<()> {
    let report = JsonReport::from_context(ctx);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
