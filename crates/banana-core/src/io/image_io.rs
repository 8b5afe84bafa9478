use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use ndarray::{Array3, ArrayView2, Axis};

use crate::consts::OVERLAY_ALPHA;
use crate::error::Result;

/// Middle slice index, the default overlay depth.
pub fn middle_slice(depth: usize) -> usize {
    depth / 2
}

/// Clamp a requested slice index into `0..depth`.
pub fn clamp_slice(z: usize, depth: usize) -> usize {
    z.min(depth.saturating_sub(1))
}

/// Save one scoremap slice as an 8-bit grayscale PNG.
///
/// Returns the (clamped) slice index that was rendered.
pub fn save_slice_png(scoremap: &Array3<f32>, z: usize, path: &Path) -> Result<usize> {
    let z = clamp_slice(z, scoremap.dim().0);
    let slice = scoremap.index_axis(Axis(0), z);
    let (h, w) = slice.dim();

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            img.put_pixel(col as u32, row as u32, Luma([to_u8(slice[[row, col]])]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(z)
}

/// Save a scoremap slice with the mask blended in red on top.
///
/// Returns the (clamped) slice index that was rendered.
pub fn save_overlay_png(
    scoremap: &Array3<f32>,
    mask: &Array3<u8>,
    z: usize,
    path: &Path,
) -> Result<usize> {
    let z = clamp_slice(z, scoremap.dim().0);
    let img = render_overlay(
        scoremap.index_axis(Axis(0), z),
        mask.index_axis(Axis(0), z),
    );
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(z)
}

/// Grayscale base with set mask pixels blended towards pure red.
pub fn render_overlay(base: ArrayView2<f32>, mask: ArrayView2<u8>) -> RgbImage {
    let (h, w) = base.dim();
    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let gray = base[[row, col]].clamp(0.0, 1.0);
            let pixel = if mask[[row, col]] != 0 {
                let blend = |from: f32, to: f32| from * (1.0 - OVERLAY_ALPHA) + to * OVERLAY_ALPHA;
                Rgb([
                    to_u8(blend(gray, 1.0)),
                    to_u8(blend(gray, 0.0)),
                    to_u8(blend(gray, 0.0)),
                ])
            } else {
                let g = to_u8(gray);
                Rgb([g, g, g])
            };
            img.put_pixel(col as u32, row as u32, pixel);
        }
    }
    img
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}
