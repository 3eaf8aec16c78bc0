//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations every backend must
//! support: identify, bound_fit, cover_crop, and write_ico.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, no system
//! libraries. Everything is statically linked into the binary.

use super::params::{BoundFitParams, CoverCropParams, IcoParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image on disk or of a written derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Width-bounded, aspect-preserving resize that never enlarges.
    /// Returns the dimensions actually written.
    fn bound_fit(&self, params: &BoundFitParams) -> Result<Dimensions, BackendError>;

    /// Scale to cover the exact geometry, then center crop. May enlarge.
    fn cover_crop(&self, params: &CoverCropParams) -> Result<(), BackendError>;

    /// Write a multi-resolution ICO container.
    fn write_ico(&self, params: &IcoParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::calculate_bound_fit;
    use crate::imaging::params::{Encoding, Quality};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mock backend that records operations without decoding anything.
    ///
    /// Writes a small placeholder file for every output so size measurement
    /// downstream sees real files. Names listed in `failing` produce a
    /// `ProcessingFailed` error instead: matched against the source for
    /// identify/bound_fit, and against the output for cover_crop/write_ico
    /// (those share one source per run).
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub source_dimensions: Mutex<Option<Dimensions>>,
        pub failing: Mutex<HashSet<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        BoundFit {
            source: String,
            output: String,
            max_width: u32,
            quality: Option<u32>,
        },
        CoverCrop {
            source: String,
            output: String,
            width: u32,
            height: u32,
            format: &'static str,
        },
        Ico {
            source: String,
            output: String,
            sizes: Vec<u32>,
        },
    }

    /// Bytes written for every mock output.
    pub const MOCK_OUTPUT: &[u8] = b"mock-derivative";

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Dimensions) -> Self {
            let backend = Self::default();
            *backend.source_dimensions.lock().unwrap() = Some(dims);
            backend
        }

        pub fn failing_on(names: &[&str]) -> Self {
            let backend = Self::default();
            *backend.failing.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
            backend
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn check_failure(&self, source: &Path) -> Result<(), BackendError> {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.failing.lock().unwrap().contains(&name) {
                return Err(BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: mock corrupt input",
                    source.display()
                )));
            }
            Ok(())
        }

        fn dims(&self) -> Dimensions {
            self.source_dimensions.lock().unwrap().unwrap_or(Dimensions {
                width: 2000,
                height: 1500,
            })
        }
    }

    fn quality_of(encoding: Encoding) -> Option<u32> {
        match encoding {
            Encoding::Jpeg(q) => Some(q.value()),
            Encoding::Png => None,
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            self.check_failure(path)?;
            Ok(self.dims())
        }

        fn bound_fit(&self, params: &BoundFitParams) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::BoundFit {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                max_width: params.max_width,
                quality: quality_of(params.encoding),
            });
            self.check_failure(&params.source)?;
            std::fs::write(&params.output, MOCK_OUTPUT)?;
            let src = self.dims();
            let (width, height) = calculate_bound_fit((src.width, src.height), params.max_width);
            Ok(Dimensions { width, height })
        }

        fn cover_crop(&self, params: &CoverCropParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::CoverCrop {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                format: params.encoding.label(),
            });
            self.check_failure(&params.output)?;
            std::fs::write(&params.output, MOCK_OUTPUT)?;
            Ok(())
        }

        fn write_ico(&self, params: &IcoParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Ico {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                sizes: params.sizes.clone(),
            });
            self.check_failure(&params.output)?;
            std::fs::write(&params.output, MOCK_OUTPUT)?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 800,
            height: 600,
        });

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_bound_fit_and_writes_placeholder() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("a.jpg");
        let backend = MockBackend::new();

        let dims = backend
            .bound_fit(&BoundFitParams {
                source: "/source/a.jpg".into(),
                output: output.clone(),
                max_width: 600,
                encoding: Encoding::Jpeg(Quality::new(85)),
            })
            .unwrap();

        assert_eq!(dims, Dimensions { width: 600, height: 450 });
        assert_eq!(std::fs::read(&output).unwrap(), MOCK_OUTPUT);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::BoundFit {
                max_width: 600,
                quality: Some(85),
                ..
            }
        ));
    }

    #[test]
    fn mock_fails_on_listed_source() {
        let backend = MockBackend::failing_on(&["corrupt.jpg"]);
        let result = backend.bound_fit(&BoundFitParams {
            source: "/source/corrupt.jpg".into(),
            output: "/nonexistent/corrupt.jpg".into(),
            max_width: 600,
            encoding: Encoding::Jpeg(Quality::default()),
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
