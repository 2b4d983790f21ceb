//! TIFF writing module
//!
//! Persists single Bayer planes as grayscale TIFF files.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::PlaneWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{PlaneEncoding, TiffCompression};
