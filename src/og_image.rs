//! Social-sharing (Open Graph) image generation.
//!
//! Cover-crops one source painting to an exact geometry (default 1200x630)
//! and writes it as a progressive JPEG. The source may be smaller than the
//! target; it is enlarged to cover.

use crate::config::OgImageConfig;
use crate::fixed::{GeometryOutcome, render_geometry};
use crate::imaging::{Encoding, ImageBackend, Quality, RustBackend};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OgImageError {
    #[error("OG source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// OG settings resolved against the site root.
#[derive(Debug, Clone)]
pub struct OgImageJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

impl OgImageJob {
    pub fn from_config(config: &OgImageConfig, root: &Path) -> Self {
        Self {
            source: root.join(&config.source),
            output: root.join(&config.output),
            width: config.width,
            height: config.height,
            quality: Quality::new(config.quality),
        }
    }
}

pub fn generate_og_image(job: &OgImageJob) -> Result<GeometryOutcome, OgImageError> {
    generate_og_image_with_backend(&RustBackend::new(), job)
}

/// Generate the OG image with a specific backend (allows testing with mock).
pub fn generate_og_image_with_backend(
    backend: &impl ImageBackend,
    job: &OgImageJob,
) -> Result<GeometryOutcome, OgImageError> {
    if !job.source.is_file() {
        return Err(OgImageError::SourceNotFound(job.source.clone()));
    }
    if let Some(parent) = job.output.parent() {
        std::fs::create_dir_all(parent).map_err(|source| OgImageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    Ok(render_geometry(
        backend,
        &job.source,
        &job.output,
        (job.width, job.height),
        Encoding::Jpeg(job.quality),
    ))
}
