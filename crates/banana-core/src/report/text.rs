use std::path::Path;

use crate::segment::{SegmentationConfig, SegmentationStats};

use super::{ArtifactNames, Assessment};

/// Everything the text, PDF and JSON reports are rendered from.
#[derive(Clone, Debug)]
pub struct ReportContext<'a> {
    pub input: &'a Path,
    pub output_dir: &'a Path,
    pub config: &'a SegmentationConfig,
    pub stats: &'a SegmentationStats,
    pub assessment: &'a Assessment,
    pub artifacts: &'a ArtifactNames,
    pub created_at: String,
}

/// Technical report: parameters, statistics and artifact names.
pub fn render_pro_report(ctx: &ReportContext<'_>) -> String {
    join_lines(pro_report_lines(ctx))
}

/// Plain-language summary for non-specialists.
pub fn render_easy_report(ctx: &ReportContext<'_>) -> String {
    join_lines(easy_report_lines(ctx))
}

/// Lines of the technical report, without line terminators.
pub fn pro_report_lines(ctx: &ReportContext<'_>) -> Vec<String> {
    let cfg = ctx.config;
    let stats = ctx.stats;
    let a = ctx.assessment;

    let mut lines = vec![
        "[Banana silver-standard report]".to_string(),
        format!("Created: {}", ctx.created_at),
        format!("Input: {}", ctx.input.display()),
        format!("Output directory: {}", ctx.output_dir.display()),
        format!("Voxel volume (mm^3/voxel): {:.6}", a.voxel_volume_mm3),
        format!(
            "Volume shape [Z, H, W]: [{}, {}, {}]",
            stats.shape[0], stats.shape[1], stats.shape[2]
        ),
        String::new(),
        "Parameters".to_string(),
        format!("  HU window: {}", cfg.hu_window),
        format!("  Soft-tissue gate: {}", cfg.soft_mask_hu),
        format!("  Top percent: {:.2}", cfg.top_percent),
        format!("  Depth smoothing width: {}", cfg.z_smooth_k),
        format!("  Minimum component area: {} px", cfg.min_area),
        String::new(),
        "Statistics".to_string(),
        format!("  Threshold (normalized): {:.4}", stats.threshold),
        format!("  Mask voxels (raw): {}", stats.voxels_raw),
        format!("  Mask voxels (clean): {}", stats.voxels_clean),
        format!("  Clean ratio: {:.6}", stats.ratio_clean),
        format!("  Region volume (mm^3): {:.2}", a.volume_mm3),
        format!("  Region volume (ml): {:.2}", a.volume_ml),
        String::new(),
        "Artifacts".to_string(),
        format!("  Image: {}", ctx.artifacts.image),
        format!("  Mask: {}", ctx.artifacts.mask),
        format!("  Overlay: {}", ctx.artifacts.overlay),
    ];
    if let Some(scoremap) = &ctx.artifacts.scoremap {
        lines.push(format!("  Score map: {scoremap}"));
    }
    lines
}

/// Lines of the plain-language summary, without line terminators.
pub fn easy_report_lines(ctx: &ReportContext<'_>) -> Vec<String> {
    let a = ctx.assessment;
    vec![
        "[Banana plain-language summary]".to_string(),
        format!("Created: {}", ctx.created_at),
        String::new(),
        format!(
            "Highlighted region: about {:.1} ml ({:.0} mm^3).",
            a.volume_ml, a.volume_mm3
        ),
        format!(
            "That is roughly the size of {} (a sphere about {:.1} cm across, radius {:.1} cm).",
            a.size.label, a.size.diameter_cm, a.size.radius_cm
        ),
        format!(
            "Screening tier: {} (illustrative {:.0}%).",
            a.risk, a.risk_pct
        ),
        format!("Suggested next step: {}", a.recommendation),
        String::new(),
        "This is an automatic, unreviewed outline for research and teaching. \
         It is not a diagnosis; ask a radiologist to review the images."
            .to_string(),
    ]
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
