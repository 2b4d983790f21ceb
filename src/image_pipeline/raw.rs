//! RAW payload reading module
//!
//! Locates the raw Bayer tail of a container blob and turns it into unpacked samples.

mod reader;
mod brcm_reader;
pub mod extractor;
pub mod types;

pub use reader::RawImageReader;
pub use brcm_reader::BrcmReader;
pub use extractor::{extract, BRCM_MAGIC};
pub use types::{PackedRawGrid, RawSampleGrid};
