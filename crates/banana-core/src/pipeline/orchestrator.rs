use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::error::Result;
use crate::io::image_io::{clamp_slice, middle_slice, save_overlay_png, save_slice_png};
use crate::io::load_volume;
use crate::io::nifti_writer::write_nifti_like;
use crate::report::{
    assess, render_easy_report, render_pro_report, write_json_report, write_pdf_report,
    ArtifactNames, ReportContext,
};
use crate::segment::produce_mask;

use super::config::{artifact_prefix, PipelineConfig};
use super::types::{NoOpReporter, PipelineArtifacts, PipelineStage, ProgressReporter};

/// Run the full pipeline with a thread-safe progress reporter.
///
/// Loads the input, segments it, then writes the image and mask volumes, the
/// overlay PNG and the four reports under `config.output_dir`, all sharing
/// one `{case}_{timestamp}` prefix.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineArtifacts> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)?;

    let now = Local::now();
    let created_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let prefix = artifact_prefix(&config.resolved_case_name(), &now);
    let out = |suffix: &str| -> PathBuf { config.output_dir.join(format!("{prefix}{suffix}")) };
    info!(input = %config.input.display(), prefix = %prefix, "Starting pipeline");

    reporter.begin_stage(PipelineStage::Loading, None);
    let loaded = load_volume(&config.input)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Segmenting, None);
    let output = produce_mask(&loaded.volume, &config.segmentation);
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::WritingVolumes, Some(2));
    let image_path = out("_image.nii.gz");
    let mask_path = out("_image_mask.nii.gz");
    write_nifti_like(&image_path, &loaded.volume.data, &loaded.volume)?;
    reporter.advance(1);
    write_nifti_like(&mask_path, &output.mask, &loaded.volume)?;
    reporter.advance(2);
    reporter.finish_stage();
    debug!(image = %image_path.display(), mask = %mask_path.display(), "Wrote volumes");

    let depth = loaded.volume.depth();
    let requested = config.overlay_slice.unwrap_or_else(|| middle_slice(depth));
    let total_images = if config.write_scoremap { 2 } else { 1 };
    reporter.begin_stage(PipelineStage::Rendering, Some(total_images));
    let overlay_slice = clamp_slice(requested, depth);
    let overlay_path = out(&format!("_overlay_z{overlay_slice}.png"));
    save_overlay_png(&output.scoremap, &output.mask, overlay_slice, &overlay_path)?;
    reporter.advance(1);
    let scoremap_path = if config.write_scoremap {
        let path = out(&format!("_scoremap_z{overlay_slice}.png"));
        save_slice_png(&output.scoremap, overlay_slice, &path)?;
        reporter.advance(2);
        Some(path)
    } else {
        None
    };
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Reporting, Some(4));
    let assessment = assess(&output.stats, loaded.volume.voxel_volume_mm3());
    let artifacts = ArtifactNames::from_paths(
        &image_path,
        &mask_path,
        &overlay_path,
        scoremap_path.as_deref(),
    );
    let ctx = ReportContext {
        input: &config.input,
        output_dir: &config.output_dir,
        config: &config.segmentation,
        stats: &output.stats,
        assessment: &assessment,
        artifacts: &artifacts,
        created_at,
    };
    let report_pro = out("_report_pro.txt");
    let report_easy = out("_report_easy.txt");
    let report_json = out("_report.json");
    let report_pdf = out("_report.pdf");
    write_text(&report_pro, &render_pro_report(&ctx))?;
    reporter.advance(1);
    write_text(&report_easy, &render_easy_report(&ctx))?;
    reporter.advance(2);
    write_json_report(&ctx, &report_json)?;
    reporter.advance(3);
    write_pdf_report(&ctx, &overlay_path, &report_pdf)?;
    reporter.advance(4);
    reporter.finish_stage();

    info!(
        voxels_clean = output.stats.voxels_clean,
        volume_ml = assessment.volume_ml,
        risk = %assessment.risk,
        "Pipeline complete"
    );

    Ok(PipelineArtifacts {
        prefix,
        source: loaded.info,
        image: image_path,
        mask: mask_path,
        overlay: overlay_path,
        overlay_slice,
        scoremap: scoremap_path,
        report_pro,
        report_easy,
        report_json,
        report_pdf,
        stats: output.stats,
        assessment,
    })
}

/// Run the full pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineArtifacts> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    Ok(())
}
