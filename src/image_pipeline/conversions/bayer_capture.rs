use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{CaptureError, Result},
    config::CaptureConfig,
    conversions::timing::PipelineTimings,
    export,
    planes::{BayerPlanes, Channel},
    raw::{BrcmReader, RawImageReader},
    tiff::{PlaneEncoding, PlaneWriter, StandardTiffWriter},
};

/// One file produced by [`BayerCapturePipeline::persist`].
enum OutputJob {
    Tiff(Channel),
    /// 8-bit tone-mapped copy of a channel, written next to its linear file
    Preview(Channel),
    Csv(Channel),
    Json,
}

pub struct BayerCapturePipeline<R: RawImageReader, W: PlaneWriter> {
    reader: R,
    writer: W,
    config: CaptureConfig,
}

impl BayerCapturePipeline<BrcmReader, StandardTiffWriter> {
    /// Builds the pipeline for `config.sensor`, rejecting an inconsistent geometry up front.
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let reader = BrcmReader::new(config.sensor.geometry())?;
        Ok(Self {
            reader,
            writer: StandardTiffWriter,
            config,
        })
    }
}

impl<R: RawImageReader, W: PlaneWriter> BayerCapturePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: CaptureConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Decodes a container blob into its four Bayer planes.
    #[instrument(skip(self, blob), fields(blob_size = blob.len(), sensor = %self.config.sensor))]
    pub fn decode(&self, blob: &[u8]) -> Result<BayerPlanes> {
        let mut timings = PipelineTimings::new();
        let planes = self.decode_timed(blob, &mut timings)?;
        let (rows, cols) = planes.shape();
        info!(
            "Capture decoded into {}x{} planes in {:.3}ms",
            cols,
            rows,
            timings.total_duration().as_secs_f64() * 1000.0
        );
        timings.log_summary();
        Ok(planes)
    }

    pub fn decode_with_timings(&self, blob: &[u8]) -> Result<(BayerPlanes, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let planes = self.decode_timed(blob, &mut timings)?;
        Ok((planes, timings))
    }

    fn decode_timed(&self, blob: &[u8], timings: &mut PipelineTimings) -> Result<BayerPlanes> {
        let grid = timings.time("decode_raw", || {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(blob)
        })?;

        let orientation = self.config.orientation;
        let planes = timings.time("split_planes", || {
            let _span = tracing::info_span!("split_planes", %orientation).entered();
            BayerPlanes::split(&grid, orientation)
        });

        Ok(planes)
    }

    /// Writes the configured outputs for `planes` into `output_dir`, named `<stem>_<channel>`.
    ///
    /// Files are written concurrently; the paths are returned in job order.
    #[instrument(skip(self, planes, output_dir), fields(output_dir = %output_dir.as_ref().display()))]
    pub fn persist<P: AsRef<Path>>(
        &self,
        planes: &BayerPlanes,
        output_dir: P,
        stem: &str,
    ) -> Result<Vec<PathBuf>>
    where
        R: Sync,
        W: Sync,
    {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|e| {
            CaptureError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let mut jobs = Vec::new();
        for &channel in &self.config.channels {
            if self.config.write_tiff {
                jobs.push(OutputJob::Tiff(channel));
            }
            if self.config.write_preview {
                jobs.push(OutputJob::Preview(channel));
            }
            if self.config.write_csv {
                jobs.push(OutputJob::Csv(channel));
            }
        }
        if self.config.write_json {
            jobs.push(OutputJob::Json);
        }

        let preview_config = CaptureConfig {
            plane_encoding: PlaneEncoding::Display8,
            ..self.config.clone()
        };

        let written = jobs
            .par_iter()
            .map(|job| {
                let path = match job {
                    OutputJob::Tiff(channel) => output_dir.join(format!(
                        "{stem}_{channel}.{}",
                        self.writer.extension()
                    )),
                    OutputJob::Preview(channel) => output_dir.join(format!(
                        "{stem}_{channel}_thumb.{}",
                        self.writer.extension()
                    )),
                    OutputJob::Csv(channel) => output_dir.join(format!("{stem}_{channel}.csv")),
                    OutputJob::Json => output_dir.join(format!("{stem}_bayer.json")),
                };

                self.write_output(&path, |out| match job {
                    OutputJob::Tiff(channel) => {
                        self.writer.write_plane(planes.get(*channel), out, &self.config)
                    }
                    OutputJob::Preview(channel) => {
                        self.writer.write_plane(planes.get(*channel), out, &preview_config)
                    }
                    OutputJob::Csv(channel) => export::write_csv(planes.get(*channel), out),
                    OutputJob::Json => export::write_json(planes, out),
                })?;
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(files = written.len(), "Capture persisted");
        Ok(written)
    }

    fn write_output(
        &self,
        path: &Path,
        encode: impl FnOnce(&mut dyn Write) -> Result<()>,
    ) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            CaptureError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        let mut out = BufWriter::new(file);
        encode(&mut out)?;
        out.flush()
            .map_err(|e| CaptureError::OutputWriteError(format!("{}: {}", path.display(), e)))
    }

    /// Decodes a recorded container file and persists its planes next to each other in
    /// `output_dir`, using the input file stem for names.
    #[instrument(skip(self, input_path, output_dir))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<Vec<PathBuf>>
    where
        R: Sync,
        W: Sync,
    {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_dir.display(),
            "Converting file"
        );

        let blob = {
            let _span = tracing::info_span!("read_input_file").entered();
            fs::read(input_path).map_err(|e| {
                CaptureError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let planes = self.decode(&blob)?;
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture".to_string());

        self.persist(&planes, output_dir, &stem)
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}
