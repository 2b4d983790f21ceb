//! Raw payload extraction from a container blob.
//!
//! The camera firmware appends the raw Bayer payload after the JPEG stream:
//!
//! ```text
//! | JPEG ... | "BRCM" + metadata (header_skip_bytes) | rows x stride packed pixels |
//!            \______________ payload_size_bytes __________________________________/
//! ```

use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::geometry::SensorGeometry;
use crate::image_pipeline::raw::types::PackedRawGrid;

/// Sentinel at the start of every raw payload.
pub const BRCM_MAGIC: [u8; 4] = *b"BRCM";

/// Slices the raw payload off the end of `blob`, checks its header and crops away the
/// alignment padding around the valid image area.
#[instrument(skip(blob, geometry), fields(sensor = %geometry.sensor, blob_size = blob.len()))]
pub fn extract<'a>(blob: &'a [u8], geometry: &SensorGeometry) -> Result<PackedRawGrid<'a>> {
    let payload_size = geometry.payload_size_bytes;
    if payload_size < BRCM_MAGIC.len() {
        return Err(CaptureError::InvalidGeometry {
            sensor: geometry.sensor,
            reason: format!("payload of {payload_size} bytes cannot hold the raw magic"),
        });
    }
    if blob.len() < payload_size {
        return Err(CaptureError::TruncatedPayload {
            sensor: geometry.sensor,
            expected: payload_size,
            actual: blob.len(),
        });
    }

    let payload = &blob[blob.len() - payload_size..];

    let mut found = [0u8; 4];
    found.copy_from_slice(&payload[..BRCM_MAGIC.len()]);
    if found != BRCM_MAGIC {
        return Err(CaptureError::BadMagic {
            sensor: geometry.sensor,
            expected: BRCM_MAGIC,
            found,
        });
    }

    let pixels = payload.get(geometry.header_skip_bytes..).unwrap_or_default();
    let expected = geometry.packed_data_bytes();
    if pixels.len() != expected {
        return Err(CaptureError::SizeMismatch {
            sensor: geometry.sensor,
            expected,
            actual: pixels.len(),
        });
    }

    debug!(
        "Raw payload located at offset {}, {} packed bytes",
        blob.len() - payload_size,
        pixels.len()
    );

    PackedRawGrid::new(
        pixels,
        geometry.packed_row_stride_bytes,
        geometry.valid_pixel_height,
        geometry.valid_row_bytes(),
    )
    .ok_or_else(|| CaptureError::Unpack {
        sensor: geometry.sensor,
        reason: format!(
            "valid area {} rows x {} bytes does not fit {} rows x {} bytes",
            geometry.valid_pixel_height,
            geometry.valid_row_bytes(),
            geometry.packed_row_count,
            geometry.packed_row_stride_bytes
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::geometry::SensorModel;

    fn small_geometry() -> SensorGeometry {
        SensorGeometry {
            sensor: SensorModel::Imx219,
            packed_row_stride_bytes: 16,
            packed_row_count: 6,
            valid_pixel_width: 8,
            valid_pixel_height: 4,
            header_skip_bytes: 8,
            payload_size_bytes: 8 + 6 * 16,
        }
    }

    fn blob_for(geometry: &SensorGeometry, prefix: &[u8]) -> Vec<u8> {
        let mut blob = prefix.to_vec();
        blob.extend_from_slice(&BRCM_MAGIC);
        blob.resize(prefix.len() + geometry.header_skip_bytes, 0xEE);
        for row in 0..geometry.packed_row_count {
            for col in 0..geometry.packed_row_stride_bytes {
                blob.push((row * 16 + col) as u8);
            }
        }
        blob
    }

    #[test]
    fn test_extract_crops_padding() {
        let geometry = small_geometry();
        let blob = blob_for(&geometry, b"\xFF\xD8 jpeg stream \xFF\xD9");

        let grid = extract(&blob, &geometry).unwrap();

        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.row_bytes(), 10);
        assert_eq!(grid.row(0), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(grid.row(3)[0], 48);
    }

    #[test]
    fn test_extract_without_prefix() {
        let geometry = small_geometry();
        let blob = blob_for(&geometry, &[]);
        assert!(extract(&blob, &geometry).is_ok());
    }

    #[test]
    fn test_truncated_blob() {
        let geometry = small_geometry();
        let blob = blob_for(&geometry, &[]);

        let err = extract(&blob[1..], &geometry).unwrap_err();

        match err {
            CaptureError::TruncatedPayload { expected, actual, .. } => {
                assert_eq!(expected, geometry.payload_size_bytes);
                assert_eq!(actual, geometry.payload_size_bytes - 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_magic() {
        let geometry = small_geometry();
        let mut blob = blob_for(&geometry, b"jpeg");
        blob[4] = b'X';

        let err = extract(&blob, &geometry).unwrap_err();

        assert!(matches!(
            err,
            CaptureError::BadMagic { found, .. } if &found == b"XRCM"
        ));
    }

    #[test]
    fn test_size_mismatch_reports_counts() {
        let geometry = SensorGeometry {
            header_skip_bytes: 16,
            ..small_geometry()
        };
        let blob = blob_for(&small_geometry(), b"jpeg");

        let err = extract(&blob, &geometry).unwrap_err();

        assert!(matches!(
            err,
            CaptureError::SizeMismatch { expected: 96, actual: 88, .. }
        ));
    }

    #[test]
    fn test_payload_smaller_than_magic_is_a_geometry_error() {
        let geometry = SensorGeometry {
            payload_size_bytes: 2,
            ..small_geometry()
        };
        let blob = blob_for(&small_geometry(), b"jpeg");

        let err = extract(&blob, &geometry).unwrap_err();

        assert!(matches!(err, CaptureError::InvalidGeometry { .. }));
    }
}
