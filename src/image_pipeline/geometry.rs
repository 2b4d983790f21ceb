//! Sensor geometry table
//!
//! Every sensor-specific byte and pixel count lives in [`SensorGeometry`]. Decoding code never
//! branches on the sensor model; it only reads the geometry resolved for it at startup.

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{CaptureError, Result};

/// Size of the metadata block at the start of every raw payload.
pub const HEADER_SKIP_BYTES: usize = 32768;

/// Bytes per packed group of four 10-bit samples.
pub const PACKED_GROUP_BYTES: usize = 5;

/// Samples per packed group.
pub const SAMPLES_PER_GROUP: usize = 4;

/// Camera sensors with a known raw payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorModel {
    /// OmniVision OV5647 (camera module v1)
    Ov5647,
    /// Sony IMX219 (camera module v2)
    Imx219,
}

impl SensorModel {
    pub const ALL: [SensorModel; 2] = [SensorModel::Ov5647, SensorModel::Imx219];

    /// Resolves the model from the `IFD0.Model` EXIF tag written by the camera firmware.
    pub fn from_exif_model(model: &str) -> Result<Self> {
        match model.trim() {
            "RP_ov5647" => Ok(SensorModel::Ov5647),
            "RP_imx219" => Ok(SensorModel::Imx219),
            other => Err(CaptureError::UnknownSensor(other.to_string())),
        }
    }

    pub fn geometry(&self) -> SensorGeometry {
        match self {
            SensorModel::Ov5647 => SensorGeometry {
                sensor: *self,
                packed_row_stride_bytes: 3264,
                packed_row_count: 1952,
                valid_pixel_width: 2592,
                valid_pixel_height: 1944,
                header_skip_bytes: HEADER_SKIP_BYTES,
                payload_size_bytes: 6_404_096,
            },
            // 2464 image rows; the sensor reports 2466, rounded up to a multiple of 16.
            SensorModel::Imx219 => SensorGeometry {
                sensor: *self,
                packed_row_stride_bytes: 4128,
                packed_row_count: 2480,
                valid_pixel_width: 3280,
                valid_pixel_height: 2464,
                header_skip_bytes: HEADER_SKIP_BYTES,
                payload_size_bytes: 10_270_208,
            },
        }
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorModel::Ov5647 => write!(f, "ov5647"),
            SensorModel::Imx219 => write!(f, "imx219"),
        }
    }
}

impl FromStr for SensorModel {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ov5647" | "v1" => Ok(SensorModel::Ov5647),
            "imx219" | "v2" => Ok(SensorModel::Imx219),
            _ => SensorModel::from_exif_model(s),
        }
    }
}

/// Byte and pixel layout of one sensor's raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorGeometry {
    pub sensor: SensorModel,
    /// Bytes per packed row, including alignment padding
    pub packed_row_stride_bytes: usize,
    /// Packed rows, including alignment padding rows
    pub packed_row_count: usize,
    pub valid_pixel_width: usize,
    pub valid_pixel_height: usize,
    /// Metadata bytes following the magic tag that carry no pixel data
    pub header_skip_bytes: usize,
    /// Total size of the raw tail appended to the container
    pub payload_size_bytes: usize,
}

impl SensorGeometry {
    /// Packed bytes per row covering the valid pixel width.
    pub fn valid_row_bytes(&self) -> usize {
        self.valid_pixel_width.div_ceil(SAMPLES_PER_GROUP) * PACKED_GROUP_BYTES
    }

    /// Pixel width the full packed stride would unpack to.
    pub fn derived_pixel_width(&self) -> usize {
        self.packed_row_stride_bytes / PACKED_GROUP_BYTES * SAMPLES_PER_GROUP
    }

    /// Pixel data bytes following the header.
    pub fn packed_data_bytes(&self) -> usize {
        self.packed_row_count * self.packed_row_stride_bytes
    }

    /// Startup check that the geometry is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| CaptureError::InvalidGeometry {
            sensor: self.sensor,
            reason,
        };

        if self.valid_pixel_width == 0 || self.valid_pixel_height == 0 {
            return Err(invalid(format!(
                "empty valid area {}x{}",
                self.valid_pixel_width, self.valid_pixel_height
            )));
        }

        if self.valid_pixel_width % SAMPLES_PER_GROUP != 0 {
            return Err(CaptureError::Unpack {
                sensor: self.sensor,
                reason: format!(
                    "valid width of {} px is not a whole number of {}-byte groups",
                    self.valid_pixel_width, PACKED_GROUP_BYTES
                ),
            });
        }

        if self.valid_pixel_width > self.derived_pixel_width() {
            return Err(CaptureError::Unpack {
                sensor: self.sensor,
                reason: format!(
                    "valid width of {} px needs {} packed bytes per row, stride is {}",
                    self.valid_pixel_width,
                    self.valid_row_bytes(),
                    self.packed_row_stride_bytes
                ),
            });
        }

        if self.valid_pixel_height > self.packed_row_count {
            return Err(invalid(format!(
                "valid height {} exceeds packed row count {}",
                self.valid_pixel_height, self.packed_row_count
            )));
        }

        let expected_payload = self.header_skip_bytes + self.packed_data_bytes();
        if self.payload_size_bytes != expected_payload {
            return Err(invalid(format!(
                "payload of {} bytes, header {} + {} rows x {} bytes = {}",
                self.payload_size_bytes,
                self.header_skip_bytes,
                self.packed_row_count,
                self.packed_row_stride_bytes,
                expected_payload
            )));
        }

        Ok(())
    }
}
