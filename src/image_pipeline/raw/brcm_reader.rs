//! Reader for containers carrying a `BRCM` raw Bayer tail.
//!
//! Composes payload extraction with 10-bit unpacking for a single, already validated
//! sensor geometry.

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::geometry::SensorGeometry;
use crate::image_pipeline::raw::extractor::extract;
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::RawSampleGrid;
use crate::image_pipeline::unpack::unpack;

/// Raw reader bound to one sensor geometry.
#[derive(Debug, Clone)]
pub struct BrcmReader {
    geometry: SensorGeometry,
}

impl BrcmReader {
    /// Creates a reader after checking the geometry is internally consistent.
    pub fn new(geometry: SensorGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }
}

impl RawImageReader for BrcmReader {
    /// Extracts and unpacks the raw tail of `blob`.
    ///
    /// A capture either decodes completely or fails; no partial grid is ever returned.
    fn read_raw(&self, blob: &[u8]) -> Result<RawSampleGrid> {
        debug!("Decoding {} raw payload from {} byte blob", self.geometry.sensor, blob.len());

        let packed = extract(blob, &self.geometry)?;
        unpack(&packed, &self.geometry)
    }
}
