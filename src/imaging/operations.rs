//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{BoundFitParams, CoverCropParams, Encoding, Quality};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for a width-bounded gallery derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundFitConfig {
    pub max_width: u32,
    pub quality: Quality,
}

/// Plan a bound-fit derivative without executing it.
///
/// The output keeps the source file name inside `output_dir`.
pub fn plan_bound_fit(source: &Path, output_dir: &Path, config: &BoundFitConfig) -> BoundFitParams {
    let filename = source.file_name().unwrap_or_default();
    BoundFitParams {
        source: source.to_path_buf(),
        output: output_dir.join(filename),
        max_width: config.max_width,
        encoding: Encoding::Jpeg(config.quality),
    }
}

/// Create a bound-fit derivative, returning its path and written dimensions.
pub fn create_bound_fit(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    config: &BoundFitConfig,
) -> Result<(PathBuf, Dimensions)> {
    let params = plan_bound_fit(source, output_dir, config);
    let dims = backend.bound_fit(&params)?;
    Ok((params.output, dims))
}

/// Plan an exact-geometry cover crop.
pub fn plan_cover_crop(
    source: &Path,
    output: &Path,
    (width, height): (u32, u32),
    encoding: Encoding,
) -> CoverCropParams {
    CoverCropParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        encoding,
    }
}

/// Create an exact-geometry cover crop at `output`.
pub fn create_cover_crop(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    geometry: (u32, u32),
    encoding: Encoding,
) -> Result<()> {
    backend.cover_crop(&plan_cover_crop(source, output, geometry, encoding))
}
