use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use banana_core::pipeline::{run_pipeline_reported, PipelineConfig};
use clap::Args;

use crate::progress::BarReporter;
use crate::summary::{print_artifacts, print_pipeline_summary};

use super::segment::SegmentationArgs;

#[derive(Args)]
pub struct RunArgs {
    /// NIfTI file, DICOM directory or zipped DICOM series
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pipeline config file (TOML). Command-line values override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Case name used as the artifact prefix
    #[arg(long)]
    pub case_name: Option<String>,

    /// Depth index of the overlay slice (middle slice by default)
    #[arg(long)]
    pub overlay_slice: Option<usize>,

    /// Also save the scoremap slice as a grayscale PNG
    #[arg(long)]
    pub scoremap: bool,

    #[command(flatten)]
    pub segmentation: SegmentationArgs,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    print_pipeline_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let artifacts = run_pipeline_reported(&config, reporter.clone())?;
    reporter.finish();

    print_artifacts(&artifacts);
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: PipelineConfig =
            toml::from_str(&contents).context("Invalid pipeline config")?;
        config.input = args.input.clone();
        config
    } else {
        PipelineConfig::new(args.input.clone(), "outputs")
    };

    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }
    if args.case_name.is_some() {
        config.case_name = args.case_name.clone();
    }
    if args.overlay_slice.is_some() {
        config.overlay_slice = args.overlay_slice;
    }
    config.write_scoremap |= args.scoremap;
    args.segmentation.apply(&mut config.segmentation);

    config.validate()?;
    Ok(config)
}
