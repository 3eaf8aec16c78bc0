//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the generators (which decide which files to write) and
//! the [`backend`](super::backend) (which does the pixel work). Swapping the
//! backend for a recording mock in tests leaves the generators untouched.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Encoding`] — Output codec: progressive JPEG at a quality, or lossless PNG.
//! - [`BoundFitParams`] — Width-bounded, aspect-preserving, never-enlarging resize.
//! - [`CoverCropParams`] — Exact-size output: scale to cover, center crop, may enlarge.
//! - [`IcoParams`] — Multi-resolution ICO container built from square cover crops.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// How a derivative is encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Progressive-scan JPEG.
    Jpeg(Quality),
    /// Lossless PNG.
    Png,
}

impl Encoding {
    /// Short name used in console output.
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Jpeg(_) => "jpeg",
            Encoding::Png => "png",
        }
    }
}

/// Parameters for a bound-fit resize.
///
/// The output width is `min(source_width, max_width)`; height follows the
/// source aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundFitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub encoding: Encoding,
}

/// Parameters for a cover-crop resize to an exact geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverCropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

/// Parameters for a multi-resolution ICO file.
///
/// Each entry in `sizes` becomes one square, PNG-compressed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct IcoParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub sizes: Vec<u32>,
}
