//! TIFF output types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Sample encoding of a persisted plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneEncoding {
    /// 10-bit samples rescaled to the full 16-bit range
    #[default]
    Linear16,
    /// 8-bit rendering through the configured tone curve, for previews
    Display8,
}
