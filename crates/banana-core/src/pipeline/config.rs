use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::consts::ARTIFACT_TIMESTAMP_FORMAT;
use crate::error::Result;
use crate::segment::SegmentationConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// NIfTI file, DICOM series directory or zipped DICOM series.
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Artifact name stem. Derived from the input name when absent.
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    /// Depth index of the overlay PNG. Middle slice when absent.
    #[serde(default)]
    pub overlay_slice: Option<usize>,
    /// Also save the scoremap slice as a grayscale PNG.
    #[serde(default)]
    pub write_scoremap: bool,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            case_name: None,
            segmentation: SegmentationConfig::default(),
            overlay_slice: None,
            write_scoremap: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()
    }

    /// Explicit case name, or one derived from the input path.
    pub fn resolved_case_name(&self) -> String {
        match &self.case_name {
            Some(name) if !name.trim().is_empty() => sanitize(name),
            _ => case_name_from_path(&self.input),
        }
    }
}

/// Input file or directory name without `.nii.gz`, `.nii` or `.zip`,
/// with whitespace replaced by underscores.
pub fn case_name_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_lowercase();
    let stem_len = [".nii.gz", ".nii", ".zip"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| name.len() - ext.len())
        .unwrap_or(name.len());
    let stem = sanitize(name.get(..stem_len).unwrap_or(&name));
    if stem.is_empty() {
        "case".to_string()
    } else {
        stem
    }
}

fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// `{case}_{YYYYmmdd_HHMMSS}`, shared by every artifact of one run.
pub fn artifact_prefix<Tz: TimeZone>(case: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{case}_{}", at.format(ARTIFACT_TIMESTAMP_FORMAT))
}
