//! Raw Bayer capture pipeline
//!
//! Turns camera containers with an appended raw payload into four Bayer channel planes:
//! the raw tail is located and validated (`raw`), its 10-bit packed rows are expanded
//! (`unpack`), and the mosaic is split into R, G1, G2 and B (`planes`). Persistence and the
//! camera itself sit behind the `tiff`, `export` and `camera` seams.

pub mod camera;
pub mod common;
pub mod config;
pub mod conversions;
pub mod export;
pub mod geometry;
pub mod planes;
pub mod raw;
pub mod timelapse;
pub mod tiff;
pub mod tone;
pub mod unpack;

pub use common::{
    CaptureError,
    Result,
};

pub use geometry::{
    SensorGeometry,
    SensorModel,
};

pub use raw::{
    BrcmReader,
    PackedRawGrid,
    RawImageReader,
    RawSampleGrid,
};

pub use planes::{
    BayerPlanes,
    Channel,
    Orientation,
    Plane,
};

pub use self::tiff::{
    PlaneEncoding,
    PlaneWriter,
    StandardTiffWriter,
    TiffCompression,
};

pub use camera::{
    CameraSession,
    CameraSource,
    ExposureSettings,
    ReplaySource,
};

pub use config::{
    CaptureConfig,
    CaptureConfigBuilder,
};

pub use conversions::{
    BayerCapturePipeline,
    PipelineTimings,
};

pub use timelapse::{
    Timelapse,
    TimelapseReport,
};

pub use tone::ToneCurve;
