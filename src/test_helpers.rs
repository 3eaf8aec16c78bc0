//! Shared test utilities: synthetic source images written with the `image`
//! crate, so tests never depend on fixture files or external tools.

use image::{ImageBuffer, Rgb, Rgba};
use std::path::Path;

/// A diagonal gradient so encoders have real detail to work with.
fn gradient(width: u32, height: u32) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Write a baseline JPEG of the given size, creating parent directories.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write an RGBA PNG of the given size with a translucent right half.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let rgb = gradient(width, height);
    let rgba = ImageBuffer::from_fn(width, height, |x, y| {
        let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
        let a = if x < width / 2 { 255 } else { 128 };
        Rgba([r, g, b, a])
    });
    rgba.save_with_format(path, image::ImageFormat::Png).unwrap();
}
