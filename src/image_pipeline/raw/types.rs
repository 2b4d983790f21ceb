//! Raw payload data types

/// Cropped view of the packed pixel rows inside a container blob.
///
/// Borrowed from the blob; rows keep their hardware stride and only the first
/// `row_bytes` of each are exposed.
#[derive(Debug, Clone, Copy)]
pub struct PackedRawGrid<'a> {
    data: &'a [u8],
    stride: usize,
    rows: usize,
    row_bytes: usize,
}

impl<'a> PackedRawGrid<'a> {
    /// Wraps `data` as rows of `stride` bytes, exposing `rows` rows of `row_bytes` each.
    ///
    /// Returns `None` if the view would reach past the end of `data`.
    pub fn new(data: &'a [u8], stride: usize, rows: usize, row_bytes: usize) -> Option<Self> {
        if row_bytes > stride || rows.checked_mul(stride)? > data.len() {
            return None;
        }
        Some(Self {
            data: &data[..rows * stride],
            stride,
            rows,
            row_bytes,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn row(&self, index: usize) -> &'a [u8] {
        let start = index * self.stride;
        &self.data[start..start + self.row_bytes]
    }
}

/// Unpacked 10-bit samples of the valid image area, row-major.
///
/// Only built through [`RawSampleGrid::from_samples`], so `data` always holds exactly
/// `width * height` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSampleGrid {
    width: usize,
    height: usize,
    data: Vec<u16>,
}

impl RawSampleGrid {
    /// Builds a grid from row-major samples. Returns `None` if the length does not match.
    pub fn from_samples(width: usize, height: usize, data: Vec<u16>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    /// Width of the image in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the image in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// One sample per photosite, each in [0, 1023]
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.data[row * self.width + col]
    }

    pub fn row(&self, index: usize) -> &[u16] {
        &self.data[index * self.width..(index + 1) * self.width]
    }
}
