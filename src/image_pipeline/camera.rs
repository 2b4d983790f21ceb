//! Camera collaborator seam
//!
//! The decode core never talks to hardware. A [`CameraSource`] hands it container blobs, and a
//! [`CameraSession`] owns the source for a bounded lifetime so it is always released.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::geometry::SensorModel;

/// ISO values the sensor firmware accepts; 0 selects automatic gain.
pub const SUPPORTED_ISO: [u32; 7] = [100, 200, 320, 400, 500, 640, 800];

/// Exposure parameters passed to the camera for one capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureSettings {
    /// Shutter time in microseconds, 0 for automatic exposure
    pub shutter_us: u32,
    /// Sensor gain as ISO, 0 for automatic gain
    pub iso: u32,
    /// Frames per second; bounds the longest shutter time
    pub framerate: f32,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            shutter_us: 0,
            iso: 0,
            framerate: 1.0,
        }
    }
}

impl ExposureSettings {
    pub fn is_auto(&self) -> bool {
        self.shutter_us == 0 && self.iso == 0
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.framerate > 0.0) {
            return Err(CaptureError::InvalidExposure(format!(
                "framerate must be positive, got {}",
                self.framerate
            )));
        }
        if self.iso != 0 && !SUPPORTED_ISO.contains(&self.iso) {
            return Err(CaptureError::InvalidExposure(format!(
                "ISO {} is not one of {:?}",
                self.iso, SUPPORTED_ISO
            )));
        }
        let frame_period_us = 1_000_000.0 / f64::from(self.framerate);
        if f64::from(self.shutter_us) > frame_period_us {
            return Err(CaptureError::InvalidExposure(format!(
                "shutter of {} us exceeds the {:.0} us frame period at {} fps",
                self.shutter_us, frame_period_us, self.framerate
            )));
        }
        Ok(())
    }
}

/// Produces container blobs carrying a raw Bayer payload.
pub trait CameraSource {
    /// Sensor fitted to the camera.
    fn sensor_model(&self) -> SensorModel;

    /// Exposes one frame and returns the container with its raw tail appended.
    fn capture(&mut self, exposure: &ExposureSettings) -> Result<Vec<u8>>;

    /// Releases the device. Called once when the owning session ends.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Scoped ownership of a camera source; the source is closed when the session is dropped.
pub struct CameraSession<S: CameraSource> {
    source: S,
    captures: usize,
    closed: bool,
}

impl<S: CameraSource> CameraSession<S> {
    pub fn open(source: S) -> Self {
        info!(sensor = %source.sensor_model(), "Camera session opened");
        Self {
            source,
            captures: 0,
            closed: false,
        }
    }

    pub fn sensor_model(&self) -> SensorModel {
        self.source.sensor_model()
    }

    pub fn captures(&self) -> usize {
        self.captures
    }

    pub fn capture(&mut self, exposure: &ExposureSettings) -> Result<Vec<u8>> {
        exposure.validate()?;
        let blob = self.source.capture(exposure)?;
        self.captures += 1;
        debug!(
            capture = self.captures,
            bytes = blob.len(),
            auto_exposure = exposure.is_auto(),
            "Frame captured"
        );
        Ok(blob)
    }

    /// Ends the session, reporting any error from releasing the device.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!(captures = self.captures, "Camera session closed");
        self.source.close()
    }
}

impl<S: CameraSource> Drop for CameraSession<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close camera: {}", e);
        }
    }
}

/// Replays container blobs previously recorded to a directory, in file name order.
pub struct ReplaySource {
    sensor: SensorModel,
    files: Vec<PathBuf>,
    next: usize,
}

impl ReplaySource {
    /// Collects every `.jpg`/`.jpeg` file in `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P, sensor: SensorModel) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            CaptureError::InputReadError(format!("{}: {}", dir.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_jpeg = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));
            if is_jpeg && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!("Replay source found {} captures in {}", files.len(), dir.display());
        Ok(Self::from_files(files, sensor))
    }

    pub fn from_files(files: Vec<PathBuf>, sensor: SensorModel) -> Self {
        Self {
            sensor,
            files,
            next: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.files.len() - self.next
    }
}

impl CameraSource for ReplaySource {
    fn sensor_model(&self) -> SensorModel {
        self.sensor
    }

    fn capture(&mut self, _exposure: &ExposureSettings) -> Result<Vec<u8>> {
        let path = self
            .files
            .get(self.next)
            .ok_or_else(|| CaptureError::CameraError("no recorded captures left".to_string()))?;
        self.next += 1;

        fs::read(path).map_err(|e| CaptureError::InputReadError(format!("{}: {}", path.display(), e)))
    }
}
