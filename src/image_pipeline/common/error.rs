use thiserror::Error;

use crate::image_pipeline::geometry::SensorModel;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("{sensor}: blob of {actual} bytes is shorter than the {expected}-byte raw payload")]
    TruncatedPayload {
        sensor: SensorModel,
        expected: usize,
        actual: usize,
    },

    #[error("{sensor}: raw payload magic {found:02x?} does not match {expected:02x?}")]
    BadMagic {
        sensor: SensorModel,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("{sensor}: packed data is {actual} bytes after header skip, expected {expected}")]
    SizeMismatch {
        sensor: SensorModel,
        expected: usize,
        actual: usize,
    },

    #[error("{sensor}: cannot unpack geometry: {reason}")]
    Unpack { sensor: SensorModel, reason: String },

    #[error("{sensor}: inconsistent geometry: {reason}")]
    InvalidGeometry { sensor: SensorModel, reason: String },

    #[error("Unknown sensor identity: {0}")]
    UnknownSensor(String),

    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),

    #[error("Sample value {value} exceeds the 10-bit range [0, 1023]")]
    SampleOutOfRange { value: u16 },

    #[error("Invalid exposure settings: {0}")]
    InvalidExposure(String),

    #[error("Camera error: {0}")]
    CameraError(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode output: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
