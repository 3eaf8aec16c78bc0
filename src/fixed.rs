//! Shared unit of work for the fixed-geometry generators.
//!
//! Favicons and the social-sharing image both take one source image and
//! write outputs at exact sizes. Each output is rendered independently: a
//! failing geometry is reported as [`GeometryOutcome::Failed`] and the
//! remaining geometries still run.

use crate::imaging::{BackendError, Encoding, ImageBackend, create_cover_crop};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why one geometry could not be written.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("could not measure {path}: {source}")]
    Measure {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One file written by a fixed-geometry generator.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub file: String,
    pub path: PathBuf,
    /// `(width, height)`; for ICO containers, the largest frame.
    pub geometry: (u32, u32),
    pub bytes: u64,
}

#[derive(Debug)]
pub enum GeometryOutcome {
    Written(WrittenFile),
    Failed { file: String, error: GeometryError },
}

impl GeometryOutcome {
    pub fn file(&self) -> &str {
        match self {
            GeometryOutcome::Written(w) => &w.file,
            GeometryOutcome::Failed { file, .. } => file,
        }
    }

    pub fn written(&self) -> Option<&WrittenFile> {
        match self {
            GeometryOutcome::Written(w) => Some(w),
            GeometryOutcome::Failed { .. } => None,
        }
    }
}

/// Display name for an output path: its file name, or the whole path.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Measure a freshly written output and wrap it as an outcome.
pub fn measure(path: &Path, geometry: (u32, u32)) -> GeometryOutcome {
    let file = file_label(path);
    match std::fs::metadata(path) {
        Ok(meta) => GeometryOutcome::Written(WrittenFile {
            file,
            path: path.to_path_buf(),
            geometry,
            bytes: meta.len(),
        }),
        Err(source) => GeometryOutcome::Failed {
            file,
            error: GeometryError::Measure {
                path: path.to_path_buf(),
                source,
            },
        },
    }
}

/// Cover-crop `source` to exactly `geometry` at `output`.
pub fn render_geometry(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    geometry: (u32, u32),
    encoding: Encoding,
) -> GeometryOutcome {
    match create_cover_crop(backend, source, output, geometry, encoding) {
        Ok(()) => measure(output, geometry),
        Err(e) => GeometryOutcome::Failed {
            file: file_label(output),
            error: e.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MOCK_OUTPUT, MockBackend};
    use crate::imaging::Quality;
    use tempfile::TempDir;

    #[test]
    fn render_geometry_measures_output() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("icon.png");
        let outcome = render_geometry(
            &MockBackend::new(),
            Path::new("/logo.png"),
            &output,
            (32, 32),
            Encoding::Png,
        );

        let written = outcome.written().expect("written");
        assert_eq!(written.file, "icon.png");
        assert_eq!(written.geometry, (32, 32));
        assert_eq!(written.bytes, MOCK_OUTPUT.len() as u64);
    }

    #[test]
    fn render_geometry_captures_backend_failure() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("og.jpg");
        let outcome = render_geometry(
            &MockBackend::failing_on(&["og.jpg"]),
            Path::new("/featured.jpg"),
            &output,
            (1200, 630),
            Encoding::Jpeg(Quality::new(90)),
        );

        assert_eq!(outcome.file(), "og.jpg");
        assert!(matches!(
            outcome,
            GeometryOutcome::Failed {
                error: GeometryError::Imaging(_),
                ..
            }
        ));
    }

    #[test]
    fn measure_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let outcome = measure(&tmp.path().join("nope.png"), (16, 16));
        assert!(matches!(
            outcome,
            GeometryOutcome::Failed {
                error: GeometryError::Measure { .. },
                ..
            }
        ));
    }
}
