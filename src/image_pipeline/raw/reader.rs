use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawSampleGrid;

pub trait RawImageReader {
    fn read_raw(&self, blob: &[u8]) -> Result<RawSampleGrid>;
}
