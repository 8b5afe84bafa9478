pub mod archive;
pub mod dicom;
pub mod image_io;
pub mod loader;
pub mod nifti_reader;
pub mod nifti_writer;

pub use loader::{load_volume, LoadedVolume};
