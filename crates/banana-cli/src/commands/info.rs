use std::path::PathBuf;

use anyhow::Result;
use banana_core::io::load_volume;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// NIfTI file, DICOM directory or zipped DICOM series
    pub input: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let loaded = load_volume(&args.input)?;
    let volume = &loaded.volume;
    let (d, h, w) = volume.shape();
    let (min_hu, max_hu) = volume.hu_range();

    println!("Input:         {}", loaded.info.path.display());
    println!("Format:        {}", loaded.info.format);
    println!("Files:         {}", loaded.info.file_count);
    println!("Shape [Z,H,W]: [{d}, {h}, {w}]");
    match volume.spacing {
        Some(sp) => println!(
            "Spacing (mm):  {:.3} x {:.3} x {:.3}",
            sp.depth, sp.row, sp.col
        ),
        None => println!("Spacing (mm):  unknown (1 mm assumed)"),
    }
    println!("Voxel volume:  {:.4} mm^3", volume.voxel_volume_mm3());
    println!("HU range:      [{min_hu:.1}, {max_hu:.1}]");

    let total_mb = (volume.voxel_count() * std::mem::size_of::<f32>()) as f64 / (1024.0 * 1024.0);
    println!("Data size:     {total_mb:.1} MB");

    Ok(())
}
