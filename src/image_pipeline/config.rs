//! Capture pipeline configuration

use crate::image_pipeline::geometry::SensorModel;
use crate::image_pipeline::planes::{Channel, Orientation};
use crate::image_pipeline::tiff::types::{PlaneEncoding, TiffCompression};
use crate::image_pipeline::tone::ToneCurve;

/// Configuration for decoding and persisting Bayer captures
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Sensor whose geometry is used to decode captures
    pub sensor: SensorModel,
    /// Flip applied by the camera, selects the channel parity mapping
    pub orientation: Orientation,
    /// Compression method for TIFF planes
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Sample encoding of TIFF planes
    pub plane_encoding: PlaneEncoding,
    /// Tone curve used by `PlaneEncoding::Display8`
    pub tone_curve: ToneCurve,
    /// Channels persisted as individual TIFF/CSV files
    pub channels: Vec<Channel>,
    pub write_tiff: bool,
    /// Also write an 8-bit `<stem>_<channel>_thumb` preview of each channel through `tone_curve`
    pub write_preview: bool,
    /// Whether to write all four planes as one JSON document
    pub write_json: bool,
    pub write_csv: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sensor: SensorModel::Imx219,
            orientation: Orientation::None,
            compression: TiffCompression::None,
            predictor: None,
            plane_encoding: PlaneEncoding::Linear16,
            tone_curve: ToneCurve::default(),
            channels: Channel::ALL.to_vec(),
            write_tiff: true,
            write_preview: false,
            write_json: false,
            write_csv: false,
        }
    }
}

impl CaptureConfig {
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }
}

/// Builder for CaptureConfig
#[derive(Default)]
pub struct CaptureConfigBuilder {
    sensor: Option<SensorModel>,
    orientation: Option<Orientation>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    plane_encoding: Option<PlaneEncoding>,
    tone_curve: Option<ToneCurve>,
    channels: Option<Vec<Channel>>,
    write_tiff: Option<bool>,
    write_preview: Option<bool>,
    write_json: Option<bool>,
    write_csv: Option<bool>,
}

impl CaptureConfigBuilder {
    pub fn sensor(mut self, sensor: SensorModel) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn plane_encoding(mut self, encoding: PlaneEncoding) -> Self {
        self.plane_encoding = Some(encoding);
        self
    }

    pub fn tone_curve(mut self, curve: ToneCurve) -> Self {
        self.tone_curve = Some(curve);
        self
    }

    pub fn channels(mut self, channels: impl Into<Vec<Channel>>) -> Self {
        self.channels = Some(channels.into());
        self
    }

    pub fn write_tiff(mut self, enable: bool) -> Self {
        self.write_tiff = Some(enable);
        self
    }

    pub fn write_preview(mut self, enable: bool) -> Self {
        self.write_preview = Some(enable);
        self
    }

    pub fn write_json(mut self, enable: bool) -> Self {
        self.write_json = Some(enable);
        self
    }

    pub fn write_csv(mut self, enable: bool) -> Self {
        self.write_csv = Some(enable);
        self
    }

    pub fn build(self) -> CaptureConfig {
        let default = CaptureConfig::default();
        CaptureConfig {
            sensor: self.sensor.unwrap_or(default.sensor),
            orientation: self.orientation.unwrap_or(default.orientation),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            plane_encoding: self.plane_encoding.unwrap_or(default.plane_encoding),
            tone_curve: self.tone_curve.unwrap_or(default.tone_curve),
            channels: self.channels.unwrap_or(default.channels),
            write_tiff: self.write_tiff.unwrap_or(default.write_tiff),
            write_preview: self.write_preview.unwrap_or(default.write_preview),
            write_json: self.write_json.unwrap_or(default.write_json),
            write_csv: self.write_csv.unwrap_or(default.write_csv),
        }
    }
}
