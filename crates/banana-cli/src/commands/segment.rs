use std::path::PathBuf;

use anyhow::{Context, Result};
use banana_core::io::load_volume;
use banana_core::io::nifti_writer::write_nifti_like;
use banana_core::segment::{produce_mask, HuRange, SegmentationConfig};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::print_segmentation_stats;

/// Segmentation overrides shared by `segment` and `run`.
#[derive(Args, Clone, Debug, Default)]
pub struct SegmentationArgs {
    /// Lower bound of the HU normalization window
    #[arg(long, allow_hyphen_values = true)]
    pub hu_lo: Option<f32>,

    /// Upper bound of the HU normalization window
    #[arg(long, allow_hyphen_values = true)]
    pub hu_hi: Option<f32>,

    /// Lower bound of the soft-tissue gate (HU)
    #[arg(long, allow_hyphen_values = true)]
    pub soft_lo: Option<f32>,

    /// Upper bound of the soft-tissue gate (HU)
    #[arg(long, allow_hyphen_values = true)]
    pub soft_hi: Option<f32>,

    /// Fraction of gated voxels kept above the threshold (0-1)
    #[arg(long)]
    pub top_percent: Option<f32>,

    /// Depth smoothing width in slices (1 disables)
    #[arg(long)]
    pub z_smooth: Option<usize>,

    /// Minimum 2D component area in pixels (0 disables pruning)
    #[arg(long)]
    pub min_area: Option<usize>,
}

impl SegmentationArgs {
    /// Overwrite the fields given on the command line.
    pub fn apply(&self, cfg: &mut SegmentationConfig) {
        cfg.hu_window = HuRange::new(
            self.hu_lo.unwrap_or(cfg.hu_window.lo),
            self.hu_hi.unwrap_or(cfg.hu_window.hi),
        );
        cfg.soft_mask_hu = HuRange::new(
            self.soft_lo.unwrap_or(cfg.soft_mask_hu.lo),
            self.soft_hi.unwrap_or(cfg.soft_mask_hu.hi),
        );
        if let Some(top) = self.top_percent {
            cfg.top_percent = top;
        }
        if let Some(k) = self.z_smooth {
            cfg.z_smooth_k = k;
        }
        if let Some(area) = self.min_area {
            cfg.min_area = area;
        }
    }
}

#[derive(Args)]
pub struct SegmentArgs {
    /// NIfTI file, DICOM directory or zipped DICOM series
    pub input: PathBuf,

    /// Output mask path (.nii or .nii.gz)
    #[arg(short, long, default_value = "mask.nii.gz")]
    pub output: PathBuf,

    /// Also write the segmentation statistics as JSON
    #[arg(long)]
    pub stats: Option<PathBuf>,

    #[command(flatten)]
    pub segmentation: SegmentationArgs,
}

pub fn run(args: &SegmentArgs) -> Result<()> {
    let mut config = SegmentationConfig::default();
    args.segmentation.apply(&mut config);
    config.validate()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message("Loading volume");
    let loaded = load_volume(&args.input)?;

    pb.set_message("Segmenting");
    let output = produce_mask(&loaded.volume, &config);

    pb.set_message("Writing mask");
    write_nifti_like(&args.output, &output.mask, &loaded.volume)
        .with_context(|| format!("Failed to write mask {}", args.output.display()))?;
    pb.finish_and_clear();

    if let Some(ref stats_path) = args.stats {
        let json = serde_json::to_string_pretty(&output.stats)?;
        std::fs::write(stats_path, json)
            .with_context(|| format!("Failed to write stats {}", stats_path.display()))?;
    }

    print_segmentation_stats(&output.stats, loaded.volume.voxel_volume_mm3());
    println!("\nMask saved to {}", args.output.display());

    Ok(())
}
