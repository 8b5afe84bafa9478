use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array3;

use crate::error::{BananaError, Result};
use crate::volume::{Affine, Volume, VoxelSpacing};

/// Size of the NIfTI-1 header.
pub const NIFTI1_HEADER_SIZE: usize = 348;

/// Offset of the voxel data in a single-file (`n+1`) NIfTI-1 image:
/// header plus the 4-byte extension flag.
pub const NIFTI1_VOX_OFFSET: usize = 352;

const NIFTI1_MAGIC: &[u8; 4] = b"n+1\0";
const DESCRIPTION: &str = "banana silver-standard";
/// `xyzt_units`: spatial unit millimetre.
const UNITS_MM: u8 = 2;
/// sform code "scanner anatomical".
const SFORM_SCANNER: i16 = 1;

/// Voxel types the writer can store.
pub trait NiftiElement: Copy {
    /// NIfTI `datatype` code.
    const DATATYPE: i16;
    /// Bits per voxel.
    const BITPIX: i16;

    fn write_le(self, w: &mut impl Write) -> std::io::Result<()>;
}

impl NiftiElement for u8 {
    const DATATYPE: i16 = 2;
    const BITPIX: i16 = 8;

    fn write_le(self, w: &mut impl Write) -> std::io::Result<()> {
        w.write_u8(self)
    }
}

impl NiftiElement for f32 {
    const DATATYPE: i16 = 16;
    const BITPIX: i16 = 32;

    fn write_le(self, w: &mut impl Write) -> std::io::Result<()> {
        w.write_f32::<LittleEndian>(self)
    }
}

/// Write a (depth, rows, cols) array as a single-file NIfTI-1 image.
///
/// Paths ending in `.gz` are gzip-compressed. Voxels are stored x-fastest
/// (cols, rows, depth), the inverse of the permutation applied on read.
/// Without spacing, 1 mm isotropic voxels are written. `affine` becomes the
/// sform; without it an axis-aligned sform is built from the spacing.
///
/// Fails with [`BananaError::InvalidShape`] when a dimension does not fit the
/// header's `i16` fields.
pub fn write_nifti<T: NiftiElement>(
    path: &Path,
    data: &Array3<T>,
    spacing: Option<VoxelSpacing>,
    affine: Option<&Affine>,
) -> Result<()> {
    let dims = header_dims(data.dim())?;
    let spacing = spacing.unwrap_or_default();
    let srows = affine.copied().unwrap_or_else(|| axis_aligned(spacing));

    let file = BufWriter::new(File::create(path)?);
    let gzip = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_image(&mut encoder, data, dims, spacing, &srows)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        write_image(&mut file, data, dims, spacing, &srows)?;
        file.flush()?;
    }
    Ok(())
}

/// Write `data` with the spacing and orientation of `reference`, so the
/// result overlays the volume it was derived from.
pub fn write_nifti_like<T: NiftiElement>(
    path: &Path,
    data: &Array3<T>,
    reference: &Volume,
) -> Result<()> {
    write_nifti(path, data, reference.spacing, reference.affine.as_ref())
}

/// `[cols, rows, depth]` as header dimensions.
fn header_dims((depth, rows, cols): (usize, usize, usize)) -> Result<[i16; 3]> {
    let to_i16 = |d: usize| {
        i16::try_from(d).map_err(|_| BananaError::InvalidShape {
            shape: vec![depth, rows, cols],
        })
    };
    Ok([to_i16(cols)?, to_i16(rows)?, to_i16(depth)?])
}

fn axis_aligned(spacing: VoxelSpacing) -> Affine {
    let (sx, sy, sz) = (spacing.col as f32, spacing.row as f32, spacing.depth as f32);
    [[sx, 0.0, 0.0, 0.0], [0.0, sy, 0.0, 0.0], [0.0, 0.0, sz, 0.0]]
}

fn write_image<T: NiftiElement>(
    w: &mut impl Write,
    data: &Array3<T>,
    dims: [i16; 3],
    spacing: VoxelSpacing,
    srows: &Affine,
) -> Result<()> {
    write_header::<T>(w, dims, spacing, srows)?;
    // Extension flag: no extensions follow.
    w.write_all(&[0u8; 4])?;
    // Logical (depth, row, col) order is exactly x-fastest on disk.
    for &v in data.iter() {
        v.write_le(w)?;
    }
    Ok(())
}

fn write_header<T: NiftiElement>(
    w: &mut impl Write,
    [cols, rows, depth]: [i16; 3],
    spacing: VoxelSpacing,
    srows: &Affine,
) -> Result<()> {
    let (sx, sy, sz) = (spacing.col as f32, spacing.row as f32, spacing.depth as f32);

    // sizeof_hdr
    w.write_i32::<LittleEndian>(NIFTI1_HEADER_SIZE as i32)?;
    // data_type[10], db_name[18], extents, session_error
    w.write_all(&[0u8; 10 + 18 + 4 + 2])?;
    // regular, dim_info
    w.write_all(&[b'r', 0])?;
    // dim[8]
    let dim = [3, cols, rows, depth, 1, 1, 1, 1];
    for d in dim {
        w.write_i16::<LittleEndian>(d)?;
    }
    // intent_p1..p3
    for _ in 0..3 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    // intent_code, datatype, bitpix, slice_start
    w.write_i16::<LittleEndian>(0)?;
    w.write_i16::<LittleEndian>(T::DATATYPE)?;
    w.write_i16::<LittleEndian>(T::BITPIX)?;
    w.write_i16::<LittleEndian>(0)?;
    // pixdim[8]; pixdim[0] is qfac
    let pixdim = [1.0, sx, sy, sz, 1.0, 1.0, 1.0, 1.0];
    for p in pixdim {
        w.write_f32::<LittleEndian>(p)?;
    }
    // vox_offset, scl_slope, scl_inter
    w.write_f32::<LittleEndian>(NIFTI1_VOX_OFFSET as f32)?;
    w.write_f32::<LittleEndian>(1.0)?;
    w.write_f32::<LittleEndian>(0.0)?;
    // slice_end, slice_code, xyzt_units
    w.write_i16::<LittleEndian>(0)?;
    w.write_u8(0)?;
    w.write_u8(UNITS_MM)?;
    // cal_max, cal_min, slice_duration, toffset
    for _ in 0..4 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    // glmax, glmin
    w.write_i32::<LittleEndian>(0)?;
    w.write_i32::<LittleEndian>(0)?;
    // descrip[80], aux_file[24]
    write_fixed_string(w, DESCRIPTION, 80)?;
    write_fixed_string(w, "", 24)?;
    // qform_code, sform_code
    w.write_i16::<LittleEndian>(0)?;
    w.write_i16::<LittleEndian>(SFORM_SCANNER)?;
    // quatern_b/c/d, qoffset_x/y/z
    for _ in 0..6 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    // srow_x, srow_y, srow_z
    for row in srows {
        for &v in row {
            w.write_f32::<LittleEndian>(v)?;
        }
    }
    // intent_name[16]
    write_fixed_string(w, "", 16)?;
    // magic
    w.write_all(NIFTI1_MAGIC)?;
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    // Pad with zeros
    for _ in to_write..len {
        w.write_all(&[0u8])?;
    }
    Ok(())
}
