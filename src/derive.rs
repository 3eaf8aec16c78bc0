//! Gallery derivative generation.
//!
//! For each qualifying painting in the source directory, writes one output
//! per configured tier and measures the result:
//!
//! ```text
//! images/paintings/dusk.jpg  (source, never modified)
//! images/originals/dusk.jpg  ← byte-for-byte backup
//! images/thumbs/dusk.jpg     ← ≤600px wide, progressive JPEG q85
//! images/optimized/dusk.jpg  ← ≤1200px wide, progressive JPEG q90
//! ```
//!
//! ## Isolation
//!
//! Every file is an independent unit of work run on the rayon pool. A unit
//! that fails (unreadable source, corrupt image, write error) becomes a
//! [`FileOutcome::Failure`] carrying its cause; the other units are not
//! affected. Only errors outside any unit abort the batch: a missing source
//! directory, or a tier directory that cannot be created.
//!
//! Outcomes are returned in source enumeration order, whatever order the
//! units finish in.

use crate::config::{GalleryConfig, Tier, TierKind, normalize_path};
use crate::imaging::{
    BackendError, BoundFitConfig, Dimensions, ImageBackend, RustBackend, create_bound_fit,
    get_dimensions,
};
use crate::report::{Savings, savings};
use crate::scan::{ScanError, SkippedEntry, SourceImage, scan_sources};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Batch-level errors. Any of these aborts the run.
#[derive(Error, Debug)]
pub enum DeriveError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Tier '{label}' would write into the source directory {path}")]
    TierIsSource { label: String, path: PathBuf },
}

/// Why a single file's unit of work failed.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("backup copy to {dest} failed: {source}")]
    Copy {
        dest: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("could not measure {path}: {source}")]
    Measure {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything the batch needs, resolved against the site root.
#[derive(Debug, Clone)]
pub struct GalleryJob {
    pub source_dir: PathBuf,
    pub extensions: Vec<String>,
    pub tiers: Vec<Tier>,
}

impl GalleryJob {
    pub fn from_config(config: &GalleryConfig, root: &Path) -> Self {
        Self {
            source_dir: root.join(&config.source_dir),
            extensions: config.extensions.clone(),
            tiers: config.resolve_tiers(root),
        }
    }
}

/// Size of one written derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct TierResult {
    pub label: String,
    pub bytes: u64,
    pub savings: Savings,
    /// Written pixel dimensions; `None` for backup copies.
    pub dimensions: Option<Dimensions>,
}

/// Measurements for one successfully processed painting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub filename: String,
    /// `None` when the source size could not be read.
    pub original_bytes: Option<u64>,
    pub tiers: Vec<TierResult>,
}

/// Result of one unit of work.
#[derive(Debug)]
pub enum FileOutcome {
    Success(ProcessingResult),
    Failure { filename: String, error: FileError },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Success(r) => &r.filename,
            FileOutcome::Failure { filename, .. } => filename,
        }
    }
}

/// Progress reported while the batch runs.
#[derive(Debug, Clone)]
pub enum DeriveEvent {
    /// A source directory entry could not be considered.
    Skipped { path: String, reason: String },
    /// Sources enumerated, units about to start.
    Started { total: usize },
    /// Source size could not be read; savings will show `n/a`.
    SizeUnavailable { filename: String, reason: String },
    /// A unit finished successfully.
    FileProcessed { filename: String },
    /// A unit failed; the batch continues.
    FileFailed { filename: String, reason: String },
}

/// All outcomes of a batch, in source order.
#[derive(Debug)]
pub struct DeriveOutput {
    pub tiers: Vec<Tier>,
    pub outcomes: Vec<FileOutcome>,
    pub skipped: Vec<SkippedEntry>,
}

impl DeriveOutput {
    pub fn successes(&self) -> Vec<&ProcessingResult> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Success(r) => Some(r),
                FileOutcome::Failure { .. } => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(&str, &FileError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failure { filename, error } => Some((filename.as_str(), error)),
                FileOutcome::Success(_) => None,
            })
            .collect()
    }

    /// Split into owned successes and failures.
    pub fn partition(self) -> (Vec<ProcessingResult>, Vec<(String, FileError)>) {
        let mut ok = Vec::new();
        let mut failed = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                FileOutcome::Success(r) => ok.push(r),
                FileOutcome::Failure { filename, error } => failed.push((filename, error)),
            }
        }
        (ok, failed)
    }
}

fn send(events: Option<&Sender<DeriveEvent>>, event: DeriveEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Run the batch with the production backend.
pub fn derive(
    job: &GalleryJob,
    events: Option<Sender<DeriveEvent>>,
) -> Result<DeriveOutput, DeriveError> {
    derive_with_backend(&RustBackend::new(), job, events)
}

/// Run the batch with a specific backend (allows testing with mock).
pub fn derive_with_backend(
    backend: &impl ImageBackend,
    job: &GalleryJob,
    events: Option<Sender<DeriveEvent>>,
) -> Result<DeriveOutput, DeriveError> {
    let listing = scan_sources(&job.source_dir, &job.extensions)?;
    ensure_tiers_outside_source(&job.source_dir, &job.tiers)?;
    prepare_tier_dirs(&job.tiers)?;

    for entry in &listing.skipped {
        send(events.as_ref(), DeriveEvent::Skipped {
            path: entry.path.display().to_string(),
            reason: entry.reason.clone(),
        });
    }
    send(events.as_ref(), DeriveEvent::Started {
        total: listing.images.len(),
    });

    let outcomes: Vec<FileOutcome> = listing
        .images
        .par_iter()
        .map(|source| {
            let outcome = process_file(backend, source, &job.tiers, events.as_ref());
            match &outcome {
                FileOutcome::Success(r) => send(events.as_ref(), DeriveEvent::FileProcessed {
                    filename: r.filename.clone(),
                }),
                FileOutcome::Failure { filename, error } => {
                    send(events.as_ref(), DeriveEvent::FileFailed {
                        filename: filename.clone(),
                        reason: error.to_string(),
                    })
                }
            }
            outcome
        })
        .collect();

    Ok(DeriveOutput {
        tiers: job.tiers.clone(),
        outcomes,
        skipped: listing.skipped,
    })
}

/// Refuse any tier whose directory resolves to the source directory.
///
/// Paths are compared both lexically and, where they exist, canonically, so
/// `..` segments, symlinks and absolute/relative spellings of the same
/// directory are all caught.
pub fn ensure_tiers_outside_source(source_dir: &Path, tiers: &[Tier]) -> Result<(), DeriveError> {
    let source_lexical = normalize_path(source_dir);
    let source_canonical = std::fs::canonicalize(source_dir).ok();
    for tier in tiers {
        let aliased = normalize_path(&tier.dir) == source_lexical
            || (source_canonical.is_some()
                && std::fs::canonicalize(&tier.dir).ok() == source_canonical);
        if aliased {
            return Err(DeriveError::TierIsSource {
                label: tier.label.clone(),
                path: source_dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Create every tier directory (and missing parents). Idempotent.
pub fn prepare_tier_dirs(tiers: &[Tier]) -> Result<(), DeriveError> {
    for tier in tiers {
        std::fs::create_dir_all(&tier.dir).map_err(|source| DeriveError::CreateDir {
            path: tier.dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Process one painting through every tier. Never panics or propagates:
/// any failure is captured in the returned outcome.
pub fn process_file(
    backend: &impl ImageBackend,
    source: &SourceImage,
    tiers: &[Tier],
    events: Option<&Sender<DeriveEvent>>,
) -> FileOutcome {
    let original_bytes = match std::fs::metadata(&source.path) {
        Ok(meta) => Some(meta.len()),
        Err(e) => {
            send(events, DeriveEvent::SizeUnavailable {
                filename: source.filename.clone(),
                reason: e.to_string(),
            });
            None
        }
    };

    match write_tiers(backend, source, tiers, original_bytes) {
        Ok(tier_results) => FileOutcome::Success(ProcessingResult {
            filename: source.filename.clone(),
            original_bytes,
            tiers: tier_results,
        }),
        Err(error) => FileOutcome::Failure {
            filename: source.filename.clone(),
            error,
        },
    }
}

fn write_tiers(
    backend: &impl ImageBackend,
    source: &SourceImage,
    tiers: &[Tier],
    original_bytes: Option<u64>,
) -> Result<Vec<TierResult>, FileError> {
    let mut results = Vec::with_capacity(tiers.len());
    for tier in tiers {
        let (output, dimensions) = match tier.kind {
            TierKind::Backup => {
                let dest = tier.dir.join(&source.filename);
                std::fs::copy(&source.path, &dest).map_err(|e| FileError::Copy {
                    dest: dest.clone(),
                    source: e,
                })?;
                (dest, None)
            }
            TierKind::BoundFit { max_width, quality } => {
                let config = BoundFitConfig { max_width, quality };
                let (path, dims) = create_bound_fit(backend, &source.path, &tier.dir, &config)?;
                (path, Some(dims))
            }
        };

        let bytes = std::fs::metadata(&output)
            .map_err(|e| FileError::Measure {
                path: output.clone(),
                source: e,
            })?
            .len();

        results.push(TierResult {
            label: tier.label.clone(),
            bytes,
            savings: savings(original_bytes, bytes),
            dimensions,
        });
    }
    Ok(results)
}

/// A source as seen by a dry run: its pixel size, or why it can't be read.
#[derive(Debug)]
pub struct SourceCheck {
    pub filename: String,
    pub dimensions: Result<(u32, u32), BackendError>,
}

/// Everything a dry run found.
#[derive(Debug)]
pub struct CheckReport {
    pub sources: Vec<SourceCheck>,
    pub skipped: Vec<SkippedEntry>,
}

/// Enumerate and identify every source without writing anything.
pub fn check_sources(job: &GalleryJob) -> Result<CheckReport, DeriveError> {
    check_sources_with_backend(&RustBackend::new(), job)
}

pub fn check_sources_with_backend(
    backend: &impl ImageBackend,
    job: &GalleryJob,
) -> Result<CheckReport, DeriveError> {
    let listing = scan_sources(&job.source_dir, &job.extensions)?;
    ensure_tiers_outside_source(&job.source_dir, &job.tiers)?;
    let sources = listing
        .images
        .par_iter()
        .map(|source| SourceCheck {
            filename: source.filename.clone(),
            dimensions: get_dimensions(backend, &source.path),
        })
        .collect();
    Ok(CheckReport {
        sources,
        skipped: listing.skipped,
    })
}
