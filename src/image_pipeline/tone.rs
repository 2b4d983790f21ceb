//! Per-sample tone transforms for persisted planes.

use rayon::prelude::*;

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::planes::Plane;
use crate::image_pipeline::unpack::MAX_SAMPLE;

/// Curve used to render 10-bit samples as 8-bit display values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneCurve {
    Linear,
    /// Display gamma; output is `(v / 1023) ^ (1 / gamma)`
    Gamma(f32),
}

impl Default for ToneCurve {
    fn default() -> Self {
        ToneCurve::Gamma(2.2)
    }
}

fn check_range(value: u16) -> Result<()> {
    if value > MAX_SAMPLE {
        return Err(CaptureError::SampleOutOfRange { value });
    }
    Ok(())
}

/// Rescales a 10-bit sample to the full 16-bit range by `65536 / 1023`.
///
/// The product for 1023 is 65536, which saturates to 65535.
pub fn scale_10_to_16(value: u16) -> Result<u16> {
    check_range(value)?;
    let scaled = u32::from(value) * 65536 / u32::from(MAX_SAMPLE);
    Ok(scaled.min(u32::from(u16::MAX)) as u16)
}

/// Maps a 10-bit sample to an 8-bit display value through `curve`.
pub fn to_display_8bit(value: u16, curve: ToneCurve) -> Result<u8> {
    check_range(value)?;
    let normalized = f32::from(value) / f32::from(MAX_SAMPLE);
    let mapped = match curve {
        ToneCurve::Linear => normalized,
        ToneCurve::Gamma(gamma) if gamma.is_finite() && gamma > 0.0 => {
            normalized.powf(gamma.recip())
        }
        ToneCurve::Gamma(gamma) => {
            return Err(CaptureError::EncodeError(format!(
                "gamma must be finite and positive, got {gamma}"
            )));
        }
    };
    Ok((mapped * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Rescales every sample of a plane to 16 bits.
pub fn plane_to_16bit(plane: &Plane) -> Result<Vec<u16>> {
    plane.data.par_iter().map(|&v| scale_10_to_16(v)).collect()
}

/// Renders every sample of a plane to 8 bits.
pub fn plane_to_display_8bit(plane: &Plane, curve: ToneCurve) -> Result<Vec<u8>> {
    plane
        .data
        .par_iter()
        .map(|&v| to_display_8bit(v, curve))
        .collect()
}
