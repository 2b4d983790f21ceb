//! Pipeline conversions module
//!
//! Orchestrates raw decoding, channel splitting and plane persistence for single captures.

mod bayer_capture;
mod timing;


pub use bayer_capture::BayerCapturePipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
