//! Favicon set and web app manifest generation.
//!
//! From one source image, writes:
//!
//! ```text
//! images/
//! ├── favicon-16x16.png           # PNG icons, cover-cropped to exact size
//! ├── favicon-32x32.png
//! ├── apple-touch-icon.png        # 180x180
//! ├── android-chrome-192x192.png
//! ├── android-chrome-512x512.png
//! ├── favicon.ico                 # multi-resolution ICO (16/32/48)
//! └── site.webmanifest            # lists the written icons ≥192px
//! ```
//!
//! The ICO is a real ICO container with PNG-compressed frames, so legacy
//! browsers that sniff the header get a valid icon directory.
//!
//! A missing source is fatal. Once the source exists, every icon is rendered
//! independently and a failure only drops that icon (and its manifest entry).

use crate::config::{FaviconsConfig, IcoConfig, IconConfig, WebManifestConfig};
use crate::fixed::{GeometryOutcome, file_label, measure, render_geometry};
use crate::imaging::{Encoding, IcoParams, ImageBackend, RustBackend};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("Favicon source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write manifest {path}: {source}")]
    WriteManifest {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Favicon settings resolved against the site root.
#[derive(Debug, Clone)]
pub struct FaviconJob {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub icons: Vec<IconConfig>,
    pub ico: IcoConfig,
    pub manifest: WebManifestConfig,
}

impl FaviconJob {
    pub fn from_config(config: &FaviconsConfig, root: &Path) -> Self {
        Self {
            source: root.join(&config.source),
            output_dir: root.join(&config.output_dir),
            icons: config.icons.clone(),
            ico: config.ico.clone(),
            manifest: config.manifest.clone(),
        }
    }
}

/// Web app manifest as serialized to `site.webmanifest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub icons: Vec<ManifestIcon>,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug)]
pub struct FaviconOutput {
    /// PNG icons in config order, then the ICO (when configured).
    pub outcomes: Vec<GeometryOutcome>,
    pub manifest_path: PathBuf,
    pub manifest: WebManifest,
}

/// Build the manifest from the icons that were actually written.
pub fn build_manifest(config: &WebManifestConfig, outcomes: &[GeometryOutcome]) -> WebManifest {
    let icons = outcomes
        .iter()
        .filter_map(GeometryOutcome::written)
        .filter(|w| w.file.to_ascii_lowercase().ends_with(".png"))
        .filter(|w| w.geometry.0.min(w.geometry.1) >= config.min_icon_size)
        .map(|w| ManifestIcon {
            src: w.file.clone(),
            sizes: format!("{}x{}", w.geometry.0, w.geometry.1),
            mime: "image/png".to_string(),
        })
        .collect();

    WebManifest {
        name: config.name.clone(),
        short_name: config.short_name.clone(),
        icons,
        theme_color: config.theme_color.clone(),
        background_color: config.background_color.clone(),
        display: config.display.clone(),
    }
}

pub fn generate_favicons(job: &FaviconJob) -> Result<FaviconOutput, FaviconError> {
    generate_favicons_with_backend(&RustBackend::new(), job)
}

/// Generate the favicon set with a specific backend (allows testing with mock).
pub fn generate_favicons_with_backend(
    backend: &impl ImageBackend,
    job: &FaviconJob,
) -> Result<FaviconOutput, FaviconError> {
    if !job.source.is_file() {
        return Err(FaviconError::SourceNotFound(job.source.clone()));
    }
    std::fs::create_dir_all(&job.output_dir).map_err(|source| FaviconError::CreateDir {
        path: job.output_dir.clone(),
        source,
    })?;

    let mut outcomes: Vec<GeometryOutcome> = job
        .icons
        .par_iter()
        .map(|icon| {
            render_geometry(
                backend,
                &job.source,
                &job.output_dir.join(&icon.file),
                (icon.width, icon.height),
                Encoding::Png,
            )
        })
        .collect();

    if !job.ico.sizes.is_empty() {
        outcomes.push(write_ico(backend, job));
    }

    let manifest = build_manifest(&job.manifest, &outcomes);
    let manifest_path = job.output_dir.join(&job.manifest.file);
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(&manifest_path, json).map_err(|source| FaviconError::WriteManifest {
        path: manifest_path.clone(),
        source,
    })?;

    Ok(FaviconOutput {
        outcomes,
        manifest_path,
        manifest,
    })
}

fn write_ico(backend: &impl ImageBackend, job: &FaviconJob) -> GeometryOutcome {
    let output = job.output_dir.join(&job.ico.file);
    let params = IcoParams {
        source: job.source.clone(),
        output: output.clone(),
        sizes: job.ico.sizes.clone(),
    };
    match backend.write_ico(&params) {
        Ok(()) => {
            let largest = job.ico.sizes.iter().copied().max().unwrap_or(0);
            measure(&output, (largest, largest))
        }
        Err(e) => GeometryOutcome::Failed {
            file: file_label(&output),
            error: e.into(),
        },
    }
}
