use std::io::{Cursor, Write};

use tiff::encoder::colortype::{Gray8, Gray16};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::config::CaptureConfig;
use crate::image_pipeline::planes::Plane;
use crate::image_pipeline::tiff::types::{PlaneEncoding, TiffCompression};
use crate::image_pipeline::tiff::writer::PlaneWriter;
use crate::image_pipeline::tone::{plane_to_16bit, plane_to_display_8bit};

pub struct StandardTiffWriter;

fn encode_error(e: tiff::TiffError) -> CaptureError {
    CaptureError::EncodeError(e.to_string())
}

impl PlaneWriter for StandardTiffWriter {
    fn write_plane(&self, plane: &Plane, output: &mut dyn Write, config: &CaptureConfig) -> Result<()> {
        debug!(
            "Encoding {} plane as TIFF: {}x{} ({:?})",
            plane.channel, plane.width, plane.height, config.plane_encoding
        );

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(encode_error)?
                .with_compression(compression);

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => Predictor::Horizontal,
                    _ => Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let (width, height) = (plane.width as u32, plane.height as u32);
            match config.plane_encoding {
                PlaneEncoding::Linear16 => {
                    let samples = plane_to_16bit(plane)?;
                    encoder
                        .write_image::<Gray16>(width, height, &samples)
                        .map_err(encode_error)?;
                }
                PlaneEncoding::Display8 => {
                    let samples = plane_to_display_8bit(plane, config.tone_curve)?;
                    encoder
                        .write_image::<Gray8>(width, height, &samples)
                        .map_err(encode_error)?;
                }
            }
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "tiff"
    }
}
