use thiserror::Error;

#[derive(Error, Debug)]
pub enum BananaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid volume shape {shape:?}: expected 3 non-empty dimensions (depth, rows, cols)")]
    InvalidShape { shape: Vec<usize> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("DICOM error: {0}")]
    Dicom(String),

    #[error("Inconsistent DICOM series: {0}")]
    DicomSeries(String),

    #[error("No DICOM slices found in {0}")]
    EmptySeries(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BananaError>;
