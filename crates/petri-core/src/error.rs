use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetriError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Flat-field correction failed: {0}")]
    FlatField(String),

    #[error("Cannot parse filename {name:?}: {reason}")]
    Parse { name: String, reason: String },

    #[error("Invalid image stack: {0}")]
    InvalidStack(String),

    #[error("Channel {channel} has {frames} staged frames, expected {expected}")]
    DimensionMismatch {
        channel: usize,
        frames: usize,
        expected: usize,
    },

    #[error("Plane index {index} out of range (total: {total})")]
    PlaneIndexOutOfRange { index: usize, total: usize },

    #[error("Empty plane sequence")]
    EmptySequence,

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PetriError>;
