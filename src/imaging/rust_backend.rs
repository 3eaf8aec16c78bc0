//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Cover crop | `calculate_fill_dimensions` + `DynamicImage::crop_imm` |
//! | Encode → progressive JPEG | `jpeg-encoder` (`set_progressive(true)`) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → ICO | `image::codecs::ico::IcoEncoder` (PNG frames) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{
    calculate_bound_fit, calculate_center_crop_offset, calculate_fill_dimensions,
};
use super::params::{BoundFitParams, CoverCropParams, Encoding, IcoParams, Quality};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from content, not the extension, so a JPEG saved
/// under a `.png` name still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Scale to cover `(width, height)`, then crop the center.
fn cover(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let filled = calculate_fill_dimensions((img.width(), img.height()), (width, height));
    let resized = img.resize_exact(filled.0, filled.1, FilterType::Lanczos3);
    let (x, y) = calculate_center_crop_offset(filled, (width, height));
    resized.crop_imm(x, y, width, height)
}

fn save_image(img: &DynamicImage, path: &Path, encoding: Encoding) -> Result<(), BackendError> {
    match encoding {
        Encoding::Jpeg(quality) => save_progressive_jpeg(img, path, quality),
        Encoding::Png => save_png(img, path),
    }
}

/// Encode as a progressive-scan JPEG. Alpha is dropped.
fn save_progressive_jpeg(
    img: &DynamicImage,
    path: &Path,
    quality: Quality,
) -> Result<(), BackendError> {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let (w16, h16) = match (u16::try_from(w), u16::try_from(h)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(BackendError::ProcessingFailed(format!(
                "JPEG dimensions {}x{} exceed 65535",
                w, h
            )));
        }
    };

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut encoder = jpeg_encoder::Encoder::new(BufWriter::new(file), quality.value() as u8);
    encoder.set_progressive(true);
    encoder
        .encode(rgb.as_raw(), w16, h16, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let rgba = img.to_rgba8();
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    PngEncoder::new(BufWriter::new(file))
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn bound_fit(&self, params: &BoundFitParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) = calculate_bound_fit((img.width(), img.height()), params.max_width);
        let out = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };
        save_image(&out, &params.output, params.encoding)?;
        Ok(Dimensions { width, height })
    }

    fn cover_crop(&self, params: &CoverCropParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let out = cover(&img, params.width, params.height);
        save_image(&out, &params.output, params.encoding)
    }

    fn write_ico(&self, params: &IcoParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let mut frames = Vec::with_capacity(params.sizes.len());
        for &size in &params.sizes {
            let rgba = cover(&img, size, size).to_rgba8();
            let frame = IcoFrame::as_png(rgba.as_raw(), size, size, ExtendedColorType::Rgba8)
                .map_err(|e| {
                    BackendError::ProcessingFailed(format!("ICO frame {size}px failed: {e}"))
                })?;
            frames.push(frame);
        }
        let file = std::fs::File::create(&params.output).map_err(BackendError::Io)?;
        IcoEncoder::new(BufWriter::new(file))
            .encode_images(&frames)
            .map_err(|e| BackendError::ProcessingFailed(format!("ICO encode failed: {}", e)))
    }
}
