use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use bayer_capture_rs::image_pipeline::{
    BayerCapturePipeline, CameraSession, CaptureConfig, Channel, ExposureSettings, Orientation,
    PlaneEncoding, ReplaySource, SensorModel, Timelapse, TiffCompression, ToneCurve,
};
use bayer_capture_rs::logger::{self, error, info};

#[derive(Parser)]
#[command(version, about = "Decode raw Bayer planes from camera captures")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode recorded JPEG+raw captures
    Decode {
        /// Capture files to decode
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Capture a series of frames at a fixed interval
    Timelapse {
        /// Directory of recorded captures replayed in place of the camera
        #[arg(long)]
        replay_dir: PathBuf,

        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Seconds between captures
        #[arg(long, default_value_t = 30)]
        interval: u64,

        /// Shutter time in microseconds, 0 for automatic exposure
        #[arg(long, default_value_t = 0)]
        shutter_us: u32,

        /// Sensor ISO, 0 for automatic gain
        #[arg(long, default_value_t = 0)]
        iso: u32,

        #[arg(long, default_value_t = 1.0)]
        framerate: f32,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Sensor model (ov5647/v1, imx219/v2 or the EXIF model string)
    #[arg(long, default_value = "imx219")]
    sensor: SensorModel,

    /// Flip applied by the camera: none, horizontal, vertical or both
    #[arg(long, default_value = "none")]
    orientation: Orientation,

    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,

    /// Use horizontal differencing for compressed TIFFs
    #[arg(long)]
    predictor: bool,

    /// Write 8-bit display TIFFs instead of 16-bit linear ones
    #[arg(long)]
    display: bool,

    /// Display gamma, 1.0 for a linear ramp
    #[arg(long, default_value_t = 2.2)]
    gamma: f32,

    /// Channels to write as TIFF/CSV
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [ChannelArg::Red, ChannelArg::Green1, ChannelArg::Green2, ChannelArg::Blue])]
    channels: Vec<ChannelArg>,

    #[arg(long)]
    no_tiff: bool,

    /// Also write an 8-bit `_thumb` preview next to each channel
    #[arg(long)]
    preview: bool,

    /// Write all four planes as one JSON document
    #[arg(long)]
    json: bool,

    /// Write one CSV file per channel
    #[arg(long)]
    csv: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChannelArg {
    Red,
    Green1,
    Green2,
    Blue,
}

impl OutputArgs {
    fn config(&self) -> anyhow::Result<CaptureConfig> {
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            bail!("gamma must be finite and positive, got {}", self.gamma);
        }
        let compression = match self.compression {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::DeflateBalanced => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        };
        let channels: Vec<Channel> = self
            .channels
            .iter()
            .map(|c| match c {
                ChannelArg::Red => Channel::Red,
                ChannelArg::Green1 => Channel::Green1,
                ChannelArg::Green2 => Channel::Green2,
                ChannelArg::Blue => Channel::Blue,
            })
            .collect();
        let tone_curve = if self.gamma == 1.0 {
            ToneCurve::Linear
        } else {
            ToneCurve::Gamma(self.gamma)
        };

        Ok(CaptureConfig::builder()
            .sensor(self.sensor)
            .orientation(self.orientation)
            .compression(compression)
            .predictor(self.predictor.then_some(2))
            .plane_encoding(if self.display {
                PlaneEncoding::Display8
            } else {
                PlaneEncoding::Linear16
            })
            .tone_curve(tone_curve)
            .channels(channels)
            .write_tiff(!self.no_tiff)
            .write_preview(self.preview)
            .write_json(self.json)
            .write_csv(self.csv)
            .build())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logger::init_with_default("debug");
    } else {
        logger::init();
    }

    match cli.command {
        Command::Decode { inputs, output } => {
            let config = output.config()?;
            info!("Decoding {} capture(s) as {}", inputs.len(), config.sensor);
            let pipeline = BayerCapturePipeline::new(config)?;

            let mut failures = 0;
            for input in &inputs {
                match pipeline.convert_file(input, &output.out) {
                    Ok(paths) => info!("{}: wrote {} file(s)", input.display(), paths.len()),
                    Err(e) => {
                        error!("{}: {}", input.display(), e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} capture(s) failed", inputs.len());
            }
        }
        Command::Timelapse {
            replay_dir,
            count,
            interval,
            shutter_us,
            iso,
            framerate,
            output,
        } => {
            let config = output.config()?;
            let source = ReplaySource::from_dir(&replay_dir, config.sensor)
                .with_context(|| format!("opening replay directory {}", replay_dir.display()))?;
            let pipeline = BayerCapturePipeline::new(config)?;
            let exposure = ExposureSettings {
                shutter_us,
                iso,
                framerate,
            };

            let mut session = CameraSession::open(source);
            let report = Timelapse::new(count, Duration::from_secs(interval))
                .with_exposure(exposure)
                .run(&mut session, &pipeline, &output.out)?;
            session.close()?;

            info!(
                "Timelapse done: {} succeeded, {} failed, {} file(s) written",
                report.succeeded,
                report.failed,
                report.outputs.len()
            );
        }
    }

    Ok(())
}
