//! Common utilities module
//!
//! Error taxonomy shared by every stage of the capture pipeline.

pub mod error;

pub use error::{CaptureError, Result};
