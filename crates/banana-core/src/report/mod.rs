pub mod assessment;
pub mod json;
pub mod pdf;
pub mod text;

pub use assessment::{assess, Assessment, RiskLevel};
pub use json::{write_json_report, JsonReport};
pub use pdf::write_pdf_report;
pub use text::{
    easy_report_lines, pro_report_lines, render_easy_report, render_pro_report, ReportContext,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

/// File names (not full paths) of the artifacts a report refers to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub image: String,
    pub mask: String,
    pub overlay: String,
    pub scoremap: Option<String>,
}

impl ArtifactNames {
    pub fn from_paths(
        image: &Path,
        mask: &Path,
        overlay: &Path,
        scoremap: Option<&Path>,
    ) -> Self {
        Self {
            image: file_name(image),
            mask: file_name(mask),
            overlay: file_name(overlay),
            scoremap: scoremap.map(file_name),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
