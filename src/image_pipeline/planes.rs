//! Bayer channel demultiplexing
//!
//! The sensors deliver a BGGR mosaic: even rows alternate green/blue starting with green,
//! odd rows alternate red/green starting with red.
//!
//! ```text
//! GBGBGBGB
//! RGRGRGRG
//! GBGBGBGB
//! RGRGRGRG
//! ```
//!
//! Flipping the capture upstream moves every color to the other row and/or column parity, so
//! the flip must be declared through [`Orientation`] rather than guessed from the data.

use std::fmt;
use std::str::FromStr;

use tracing::instrument;

use crate::image_pipeline::common::error::{CaptureError, Result};
use crate::image_pipeline::raw::types::RawSampleGrid;

/// Flip applied to the capture by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Orientation {
    fn flips(&self) -> (usize, usize) {
        match self {
            Orientation::None => (0, 0),
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::Both => (1, 1),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::None => "none",
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for Orientation {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Orientation::None),
            "horizontal" | "hflip" => Ok(Orientation::Horizontal),
            "vertical" | "vflip" => Ok(Orientation::Vertical),
            "both" => Ok(Orientation::Both),
            other => Err(CaptureError::UnknownOrientation(other.to_string())),
        }
    }
}

/// Color channel of a Bayer plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green1,
    Green2,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green1, Channel::Green2, Channel::Blue];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green1 => "green1",
            Channel::Green2 => "green2",
            Channel::Blue => "blue",
        }
    }

    /// (row, column) parity of the channel on an unflipped capture.
    fn parity(&self) -> (usize, usize) {
        match self {
            Channel::Red => (1, 0),
            Channel::Green1 => (0, 0),
            Channel::Green2 => (1, 1),
            Channel::Blue => (0, 1),
        }
    }

    /// (row, column) offset of the channel in a capture taken with `orientation`.
    pub fn offset(&self, orientation: Orientation) -> (usize, usize) {
        let (row, col) = self.parity();
        let (row_flip, col_flip) = orientation.flips();
        (row ^ row_flip, col ^ col_flip)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single channel at half resolution of the mosaic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub channel: Channel,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
}

impl Plane {
    fn select(grid: &RawSampleGrid, channel: Channel, orientation: Orientation) -> Self {
        let (row_offset, col_offset) = channel.offset(orientation);
        let width = grid.width() / 2;
        let height = grid.height() / 2;

        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = grid.row(y * 2 + row_offset);
            data.extend(row.iter().skip(col_offset).step_by(2).take(width));
        }

        Self {
            channel,
            width,
            height,
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.data[row * self.width + col]
    }

    /// Row-major rows; yields nothing for an empty plane.
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.data.chunks(self.width.max(1)).take(self.height)
    }
}

/// The four Bayer channel planes of one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayerPlanes {
    pub red: Plane,
    pub green1: Plane,
    pub green2: Plane,
    pub blue: Plane,
}

impl BayerPlanes {
    /// Splits the mosaic into R, G1, G2 and B planes, building them concurrently.
    #[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
    pub fn split(grid: &RawSampleGrid, orientation: Orientation) -> Self {
        let ((red, green1), (green2, blue)) = rayon::join(
            || {
                rayon::join(
                    || Plane::select(grid, Channel::Red, orientation),
                    || Plane::select(grid, Channel::Green1, orientation),
                )
            },
            || {
                rayon::join(
                    || Plane::select(grid, Channel::Green2, orientation),
                    || Plane::select(grid, Channel::Blue, orientation),
                )
            },
        );

        Self {
            red,
            green1,
            green2,
            blue,
        }
    }

    pub fn get(&self, channel: Channel) -> &Plane {
        match channel {
            Channel::Red => &self.red,
            Channel::Green1 => &self.green1,
            Channel::Green2 => &self.green2,
            Channel::Blue => &self.blue,
        }
    }

    /// Planes in R, G1, G2, B order.
    pub fn planes(&self) -> [&Plane; 4] {
        [&self.red, &self.green1, &self.green2, &self.blue]
    }

    /// Shape shared by all four planes as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.red.shape()
    }
}
