//! Interval capture loop
//!
//! Captures a fixed number of frames from a camera session, decoding and persisting each one
//! before waiting for the next slot. A failed capture is logged and counted; whether to retry
//! is left to the caller.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, info_span, warn};

use crate::image_pipeline::camera::{CameraSession, CameraSource, ExposureSettings};
use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::conversions::BayerCapturePipeline;
use crate::image_pipeline::raw::RawImageReader;
use crate::image_pipeline::tiff::PlaneWriter;

#[derive(Debug, Clone)]
pub struct Timelapse {
    pub captures: usize,
    pub interval: Duration,
    pub exposure: ExposureSettings,
}

/// Outcome of a timelapse run.
#[derive(Debug, Default)]
pub struct TimelapseReport {
    pub succeeded: usize,
    pub failed: usize,
    pub outputs: Vec<PathBuf>,
}

impl Timelapse {
    pub fn new(captures: usize, interval: Duration) -> Self {
        Self {
            captures,
            interval,
            exposure: ExposureSettings::default(),
        }
    }

    pub fn with_exposure(mut self, exposure: ExposureSettings) -> Self {
        self.exposure = exposure;
        self
    }

    /// Runs the loop. Fails up front if the camera's sensor differs from the pipeline's.
    pub fn run<S, R, W>(
        &self,
        session: &mut CameraSession<S>,
        pipeline: &BayerCapturePipeline<R, W>,
        output_dir: &Path,
    ) -> Result<TimelapseReport>
    where
        S: CameraSource,
        R: RawImageReader + Sync,
        W: PlaneWriter + Sync,
    {
        let configured = pipeline.config().sensor;
        if session.sensor_model() != configured {
            return Err(CaptureError::CameraError(format!(
                "camera reports {}, pipeline is configured for {}",
                session.sensor_model(),
                configured
            )));
        }
        self.exposure.validate()?;

        let mut report = TimelapseReport::default();
        for index in 0..self.captures {
            let _span = info_span!("capture", index).entered();
            info!(
                shutter_us = self.exposure.shutter_us,
                iso = self.exposure.iso,
                framerate = self.exposure.framerate,
                "Capturing"
            );

            let stem = format!("{}_{:03}", Local::now().format("%Y%m%d_%H%M%S"), index);
            match capture_one(session, pipeline, &self.exposure, output_dir, &stem) {
                Ok(paths) => {
                    report.succeeded += 1;
                    report.outputs.extend(paths);
                }
                Err(e) => {
                    error!("Capture {} failed: {}", index, e);
                    report.failed += 1;
                }
            }

            if index + 1 < self.captures && !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }

        if report.failed > 0 {
            warn!(
                failed = report.failed,
                succeeded = report.succeeded,
                "Timelapse finished with failures"
            );
        } else {
            info!(succeeded = report.succeeded, "Timelapse finished");
        }
        Ok(report)
    }
}

fn capture_one<S, R, W>(
    session: &mut CameraSession<S>,
    pipeline: &BayerCapturePipeline<R, W>,
    exposure: &ExposureSettings,
    output_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>>
where
    S: CameraSource,
    R: RawImageReader + Sync,
    W: PlaneWriter + Sync,
{
    let blob = session.capture(exposure)?;
    let planes = pipeline.decode(&blob)?;
    pipeline.persist(&planes, output_dir, stem)
}
