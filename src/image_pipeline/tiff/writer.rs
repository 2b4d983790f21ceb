use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::config::CaptureConfig;
use crate::image_pipeline::planes::Plane;

pub trait PlaneWriter {
    fn write_plane(&self, plane: &Plane, output: &mut dyn Write, config: &CaptureConfig) -> Result<()>;

    /// File extension of the encoded output, without the dot.
    fn extension(&self) -> &'static str;
}
