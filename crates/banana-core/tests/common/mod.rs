use std::ops::Range;
use std::path::{Path, PathBuf};

use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use ndarray::{s, Array2, Array3};

use banana_core::io::nifti_writer::write_nifti;
use banana_core::volume::{Volume, VoxelSpacing};

/// HU value outside the default soft-tissue gate.
pub const AIR_HU: f32 = -1000.0;

/// HU value inside the default gate; normalizes to ~0.583 with the default window.
pub const TISSUE_HU: f32 = 150.0;

/// Volume of `dim` filled with `background` and a box of `value` HU.
pub fn box_volume(
    dim: (usize, usize, usize),
    background: f32,
    value: f32,
    z: Range<usize>,
    rows: Range<usize>,
    cols: Range<usize>,
) -> Volume {
    let mut data = Array3::<f32>::from_elem(dim, background);
    data.slice_mut(s![z, rows, cols]).fill(value);
    Volume::new(data).unwrap()
}

/// Air volume with a tissue box.
pub fn tissue_box(
    dim: (usize, usize, usize),
    z: Range<usize>,
    rows: Range<usize>,
    cols: Range<usize>,
) -> Volume {
    box_volume(dim, AIR_HU, TISSUE_HU, z, rows, cols)
}

/// Binary slice with the listed pixels set.
pub fn slice_from_pixels(dim: (usize, usize), pixels: &[(usize, usize)]) -> Array2<u8> {
    let mut slice = Array2::<u8>::zeros(dim);
    for &(r, c) in pixels {
        slice[[r, c]] = 1;
    }
    slice
}

/// Binary slice with a filled rectangle.
pub fn slice_with_rect(dim: (usize, usize), rows: Range<usize>, cols: Range<usize>) -> Array2<u8> {
    let mut slice = Array2::<u8>::zeros(dim);
    slice.slice_mut(s![rows, cols]).fill(1);
    slice
}

/// Stack of binary slices where slice `z` is set everywhere iff `pattern[z]`.
pub fn stack_from_pattern(pattern: &[bool], rows: usize, cols: usize) -> Array3<u8> {
    let mut mask = Array3::<u8>::zeros((pattern.len(), rows, cols));
    for (z, &on) in pattern.iter().enumerate() {
        if on {
            mask.slice_mut(s![z, .., ..]).fill(1);
        }
    }
    mask
}

/// Write `volume` as a gzip NIfTI file under `dir`.
pub fn write_volume(dir: &Path, name: &str, volume: &Volume, spacing: Option<VoxelSpacing>) -> PathBuf {
    let path = dir.join(name);
    write_nifti(&path, &volume.data, spacing, None).unwrap();
    path
}

/// Rescale intercept of the synthetic CT slices: HU = stored - 1024.
pub const CT_INTERCEPT: i32 = -1024;

/// A single-frame CT slice stored as 16-bit unsigned values.
pub struct CtSlice {
    pub rows: u16,
    pub cols: u16,
    /// Stored values in row-major order.
    pub stored: Vec<u16>,
    pub instance_number: Option<i32>,
    pub position_z: Option<f64>,
    pub slice_thickness: Option<f64>,
    /// PixelSpacing as (row, col).
    pub pixel_spacing: Option<(f64, f64)>,
}

impl CtSlice {
    /// Slice whose HU at (r, c) is `hu(r, c)`.
    pub fn from_hu(rows: u16, cols: u16, hu: impl Fn(usize, usize) -> i32) -> Self {
        let stored = (0..rows as usize)
            .flat_map(|r| (0..cols as usize).map(move |c| (r, c)))
            .map(|(r, c)| (hu(r, c) - CT_INTERCEPT) as u16)
            .collect();
        Self {
            rows,
            cols,
            stored,
            instance_number: None,
            position_z: None,
            slice_thickness: None,
            pixel_spacing: None,
        }
    }
}

/// Write `slice` as an explicit VR little endian CT image file.
pub fn write_ct_slice(path: &Path, slice: &CtSlice) {
    let sop_instance = format!("2.25.{}", 1000 + slice.instance_number.unwrap_or(0));
    let mut obj = InMemDicomObject::from_element_iter([
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, uids::CT_IMAGE_STORAGE),
        DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(sop_instance.as_str())),
        DataElement::new(tags::MODALITY, VR::CS, "CT"),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(slice.rows)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(slice.cols)),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2"),
        DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)),
        DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
        DataElement::new(tags::RESCALE_INTERCEPT, VR::DS, "-1024"),
        DataElement::new(tags::RESCALE_SLOPE, VR::DS, "1"),
    ]);
    if let Some(n) = slice.instance_number {
        obj.put(DataElement::new(
            tags::INSTANCE_NUMBER,
            VR::IS,
            PrimitiveValue::from(n.to_string().as_str()),
        ));
    }
    if let Some(z) = slice.position_z {
        obj.put(DataElement::new(
            tags::IMAGE_POSITION_PATIENT,
            VR::DS,
            PrimitiveValue::from(format!("0\\0\\{z}").as_str()),
        ));
    }
    if let Some(t) = slice.slice_thickness {
        obj.put(DataElement::new(
            tags::SLICE_THICKNESS,
            VR::DS,
            PrimitiveValue::from(t.to_string().as_str()),
        ));
    }
    if let Some((row, col)) = slice.pixel_spacing {
        obj.put(DataElement::new(
            tags::PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::from(format!("{row}\\{col}").as_str()),
        ));
    }
    let bytes: Vec<u8> = slice.stored.iter().flat_map(|v| v.to_le_bytes()).collect();
    obj.put(DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(bytes)));

    obj.with_meta(FileMetaTableBuilder::new().transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN))
        .unwrap()
        .write_to_file(path)
        .unwrap();
}
