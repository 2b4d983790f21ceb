//! 10-bit packed sample unpacking
//!
//! Each row is a run of 5-byte groups. The first four bytes are the high 8 bits of four
//! consecutive samples, the fifth byte carries their low 2 bits, first sample in the most
//! significant field:
//!
//! ```text
//! byte 0   byte 1   byte 2   byte 3   byte 4
//! AAAAAAAA BBBBBBBB CCCCCCCC DDDDDDDD AABBCCDD
//! ```

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::geometry::{PACKED_GROUP_BYTES, SAMPLES_PER_GROUP, SensorGeometry};
use crate::image_pipeline::raw::types::{PackedRawGrid, RawSampleGrid};

/// Largest value a 10-bit sample can hold.
pub const MAX_SAMPLE: u16 = 1023;

#[inline]
fn expand(high: u8, low_bits: u8, position: usize) -> u16 {
    let shift = (SAMPLES_PER_GROUP - 1 - position) * 2;
    (u16::from(high) << 2) | u16::from((low_bits >> shift) & 0b11)
}

/// Unpacks one 5-byte group into its four samples.
pub fn unpack_group(group: &[u8; PACKED_GROUP_BYTES]) -> [u16; SAMPLES_PER_GROUP] {
    std::array::from_fn(|k| expand(group[k], group[SAMPLES_PER_GROUP], k))
}

fn unpack_row(packed: &[u8], out: &mut [u16]) {
    for (group, samples) in packed
        .chunks_exact(PACKED_GROUP_BYTES)
        .zip(out.chunks_mut(SAMPLES_PER_GROUP))
    {
        let low_bits = group[SAMPLES_PER_GROUP];
        for (k, sample) in samples.iter_mut().enumerate() {
            *sample = expand(group[k], low_bits, k);
        }
    }
}

/// Expands a cropped packed grid into one 16-bit sample per pixel.
///
/// Rows are independent and unpacked in parallel.
#[instrument(skip_all, fields(sensor = %geometry.sensor))]
pub fn unpack(packed: &PackedRawGrid<'_>, geometry: &SensorGeometry) -> Result<RawSampleGrid> {
    let width = geometry.valid_pixel_width;
    let height = geometry.valid_pixel_height;
    let unpack_error = |reason: String| CaptureError::Unpack {
        sensor: geometry.sensor,
        reason,
    };

    if width == 0 || width % SAMPLES_PER_GROUP != 0 {
        return Err(unpack_error(format!(
            "valid width of {width} px is not a whole number of {PACKED_GROUP_BYTES}-byte groups"
        )));
    }
    if packed.row_bytes() != geometry.valid_row_bytes() || packed.rows() != height {
        return Err(unpack_error(format!(
            "packed grid is {} rows x {} bytes, geometry expects {} rows x {} bytes",
            packed.rows(),
            packed.row_bytes(),
            height,
            geometry.valid_row_bytes()
        )));
    }

    let mut data = vec![0u16; width * height];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| unpack_row(packed.row(y), out_row));

    debug!("Unpacked {}x{} samples", width, height);

    RawSampleGrid::from_samples(width, height, data)
        .ok_or_else(|| unpack_error("sample count does not match the valid area".to_string()))
}

/// Packs 10-bit samples into the 5-byte group layout.
///
/// Inverse of [`unpack_group`]. A trailing partial group is padded with zero samples and
/// values are truncated to their low 10 bits.
pub fn pack_row(samples: &[u16]) -> Vec<u8> {
    let mut packed =
        Vec::with_capacity(samples.len().div_ceil(SAMPLES_PER_GROUP) * PACKED_GROUP_BYTES);
    for chunk in samples.chunks(SAMPLES_PER_GROUP) {
        let mut low_bits = 0u8;
        for k in 0..SAMPLES_PER_GROUP {
            let sample = chunk.get(k).copied().unwrap_or(0) & MAX_SAMPLE;
            packed.push((sample >> 2) as u8);
            low_bits |= ((sample & 0b11) as u8) << ((SAMPLES_PER_GROUP - 1 - k) * 2);
        }
        packed.push(low_bits);
    }
    packed
}
