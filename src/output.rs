//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to the terminal. Format
//! functions are pure: no I/O, no side effects.
//!
//! Errors and warnings go to stderr with an `error:`/`warning:` prefix and
//! the file name first, so a failing file can be found without a debugger.
//!
//! # Output Format
//!
//! ## Derive
//!
//! ```text
//! Processing 2 images
//!     a.jpg: done
//! error: corrupt.jpg: Processing failed: Failed to decode ...
//!
//! a.jpg
//!     original: 1.91 MB
//!     thumbnails: 45.12 KB, 600x450 (saved 97.7%)
//!     optimized: 180.40 KB, 1200x900 (saved 90.8%)
//!
//! Totals (1 image)
//!     original: 1.91 MB
//!     thumbnails: 45.12 KB (saved 97.7%)
//!     optimized: 180.40 KB (saved 90.8%)
//!     initial load: 45.12 KB
//!     worst case: 225.52 KB
//! Failed (1): corrupt.jpg
//! ```
//!
//! ## Favicons / OG image
//!
//! ```text
//! favicon-16x16.png 16x16 (1.02 KB)
//! favicon.ico 48x48 (9.40 KB)
//! site.webmanifest (2 icons)
//! ```

use crate::derive::{CheckReport, DeriveEvent, FileError, ProcessingResult};
use crate::scan::SkippedEntry;
use crate::favicon::FaviconOutput;
use crate::fixed::GeometryOutcome;
use crate::report::{AggregateReport, format_bytes};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

// ============================================================================
// Derive
// ============================================================================

/// Whether an event belongs on stderr.
fn is_diagnostic(event: &DeriveEvent) -> bool {
    matches!(
        event,
        DeriveEvent::FileFailed { .. }
            | DeriveEvent::SizeUnavailable { .. }
            | DeriveEvent::Skipped { .. }
    )
}

/// Format a single progress event as display lines.
pub fn format_derive_event(event: &DeriveEvent) -> Vec<String> {
    match event {
        DeriveEvent::Skipped { path, reason } => {
            vec![format!("warning: {}: skipped ({})", path, reason)]
        }
        DeriveEvent::Started { total } => vec![format!("Processing {}", plural(*total, "image"))],
        DeriveEvent::FileProcessed { filename } => {
            vec![format!("{}{}: done", indent(1), filename)]
        }
        DeriveEvent::FileFailed { filename, reason } => {
            vec![format!("error: {}: {}", filename, reason)]
        }
        DeriveEvent::SizeUnavailable { filename, reason } => vec![format!(
            "warning: {}: source size unavailable ({}); savings will show n/a",
            filename, reason
        )],
    }
}

/// Print a progress event, diagnostics to stderr.
pub fn print_derive_event(event: &DeriveEvent) {
    let diagnostic = is_diagnostic(event);
    for line in format_derive_event(event) {
        if diagnostic {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format per-file rows, totals, and the failure summary.
pub fn format_derive_report(
    report: &AggregateReport,
    results: &[ProcessingResult],
    failures: &[(String, FileError)],
) -> Vec<String> {
    let mut lines = Vec::new();

    for result in results {
        lines.push(String::new());
        lines.push(result.filename.clone());
        let original = match result.original_bytes {
            Some(bytes) => format_bytes(bytes),
            None => "unknown".to_string(),
        };
        lines.push(format!("{}original: {}", indent(1), original));

        for tier in report.tiers.iter() {
            let Some(tr) = result.tiers.iter().find(|t| t.label == tier.label) else {
                continue;
            };
            let dims = tr
                .dimensions
                .map(|d| format!(", {}x{}", d.width, d.height))
                .unwrap_or_default();
            lines.push(format!(
                "{}{}: {}{} (saved {})",
                indent(1),
                tr.label,
                format_bytes(tr.bytes),
                dims,
                tr.savings
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("Totals ({})", plural(report.files, "image")));
    let unmeasured = if report.unmeasured > 0 {
        format!(
            " ({} unmeasured, excluded from savings)",
            plural(report.unmeasured, "image")
        )
    } else {
        String::new()
    };
    lines.push(format!(
        "{}original: {}{}",
        indent(1),
        format_bytes(report.original_bytes),
        unmeasured
    ));
    for tier in &report.tiers {
        lines.push(format!(
            "{}{}: {} (saved {})",
            indent(1),
            tier.label,
            format_bytes(tier.bytes),
            tier.savings
        ));
    }
    lines.push(format!(
        "{}initial load: {}",
        indent(1),
        format_bytes(report.initial_load)
    ));
    lines.push(format!(
        "{}worst case: {}",
        indent(1),
        format_bytes(report.worst_case)
    ));

    if !failures.is_empty() {
        let names: Vec<&str> = failures.iter().map(|(name, _)| name.as_str()).collect();
        lines.push(format!("Failed ({}): {}", failures.len(), names.join(", ")));
    }

    lines
}

pub fn print_derive_report(
    report: &AggregateReport,
    results: &[ProcessingResult],
    failures: &[(String, FileError)],
) {
    for line in format_derive_report(report, results, failures) {
        println!("{}", line);
    }
}

// ============================================================================
// Fixed-geometry generators
// ============================================================================

/// Format written files; failures are formatted separately for stderr.
pub fn format_geometry_outcomes(outcomes: &[GeometryOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(GeometryOutcome::written)
        .map(|w| {
            format!(
                "{} {}x{} ({})",
                w.file,
                w.geometry.0,
                w.geometry.1,
                format_bytes(w.bytes)
            )
        })
        .collect()
}

/// One `error:` line per failed geometry.
pub fn format_geometry_failures(outcomes: &[GeometryOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|o| match o {
            GeometryOutcome::Failed { file, error } => Some(format!("error: {}: {}", file, error)),
            GeometryOutcome::Written(_) => None,
        })
        .collect()
}

pub fn print_geometry_outcomes(outcomes: &[GeometryOutcome]) {
    for line in format_geometry_outcomes(outcomes) {
        println!("{}", line);
    }
    for line in format_geometry_failures(outcomes) {
        eprintln!("{}", line);
    }
}

pub fn format_favicon_output(output: &FaviconOutput) -> Vec<String> {
    let mut lines = format_geometry_outcomes(&output.outcomes);
    let name = output
        .manifest_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.manifest_path.display().to_string());
    lines.push(format!(
        "{} ({})",
        name,
        plural(output.manifest.icons.len(), "icon")
    ));
    lines
}

pub fn print_favicon_output(output: &FaviconOutput) {
    for line in format_favicon_output(output) {
        println!("{}", line);
    }
    for line in format_geometry_failures(&output.outcomes) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// List the sources a `derive` run would process, with their pixel size.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!("Sources ({})", plural(report.sources.len(), "image"))];
    lines.extend(report.sources.iter().map(|c| match &c.dimensions {
        Ok((w, h)) => format!("{}{} {}x{}", indent(1), c.filename, w, h),
        Err(_) => format!("{}{} unreadable", indent(1), c.filename),
    }));
    lines
}

fn format_skipped(entry: &SkippedEntry) -> String {
    format!("warning: {}: skipped ({})", entry.path.display(), entry.reason)
}

/// Diagnostics for stderr: skipped entries, then unidentifiable sources.
pub fn format_check_failures(report: &CheckReport) -> Vec<String> {
    let mut lines: Vec<String> = report.skipped.iter().map(format_skipped).collect();
    lines.extend(report.sources.iter().filter_map(|c| match &c.dimensions {
        Err(e) => Some(format!("error: {}: {}", c.filename, e)),
        Ok(_) => None,
    }));
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
    for line in format_check_failures(report) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;
    use crate::derive::{SourceCheck, TierResult};
    use crate::fixed::{GeometryError, WrittenFile};
    use crate::imaging::{BackendError, Dimensions};
    use crate::report::savings;
    use std::path::{Path, PathBuf};

    fn sample_result() -> ProcessingResult {
        ProcessingResult {
            filename: "a.jpg".into(),
            original_bytes: Some(2_000_000),
            tiers: vec![
                TierResult {
                    label: "originals".into(),
                    bytes: 2_000_000,
                    savings: savings(Some(2_000_000), 2_000_000),
                    dimensions: None,
                },
                TierResult {
                    label: "thumbnails".into(),
                    bytes: 50_000,
                    savings: savings(Some(2_000_000), 50_000),
                    dimensions: Some(Dimensions {
                        width: 600,
                        height: 450,
                    }),
                },
                TierResult {
                    label: "optimized".into(),
                    bytes: 200_000,
                    savings: savings(Some(2_000_000), 200_000),
                    dimensions: Some(Dimensions {
                        width: 1200,
                        height: 900,
                    }),
                },
            ],
        }
    }

    fn report_for(results: &[ProcessingResult]) -> AggregateReport {
        let tiers = GalleryConfig::default().resolve_tiers(Path::new("/site"));
        AggregateReport::from_results(&tiers, results)
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(3, "icon"), "3 icons");
    }

    #[test]
    fn format_started_event() {
        let lines = format_derive_event(&DeriveEvent::Started { total: 3 });
        assert_eq!(lines, vec!["Processing 3 images"]);
    }

    #[test]
    fn format_failed_event_names_file() {
        let event = DeriveEvent::FileFailed {
            filename: "corrupt.jpg".into(),
            reason: "Processing failed: bad data".into(),
        };
        assert!(is_diagnostic(&event));
        assert_eq!(
            format_derive_event(&event),
            vec!["error: corrupt.jpg: Processing failed: bad data"]
        );
    }

    #[test]
    fn processed_event_is_not_diagnostic() {
        let event = DeriveEvent::FileProcessed {
            filename: "a.jpg".into(),
        };
        assert!(!is_diagnostic(&event));
        assert_eq!(format_derive_event(&event), vec!["    a.jpg: done"]);
    }

    #[test]
    fn report_row_shows_resize_tiers_only() {
        let results = vec![sample_result()];
        let lines = format_derive_report(&report_for(&results), &results, &[]);

        assert_eq!(lines[1], "a.jpg");
        assert_eq!(lines[2], "    original: 1.91 MB");
        assert_eq!(lines[3], "    thumbnails: 48.83 KB, 600x450 (saved 97.5%)");
        assert_eq!(lines[4], "    optimized: 195.31 KB, 1200x900 (saved 90.0%)");
        assert!(!lines.iter().any(|l| l.contains("originals:")));
    }

    #[test]
    fn report_totals_section() {
        let results = vec![sample_result()];
        let lines = format_derive_report(&report_for(&results), &results, &[]);

        let totals = lines.iter().position(|l| l == "Totals (1 image)").unwrap();
        assert_eq!(lines[totals + 1], "    original: 1.91 MB");
        assert_eq!(lines[totals + 2], "    thumbnails: 48.83 KB (saved 97.5%)");
        assert_eq!(lines[totals + 3], "    optimized: 195.31 KB (saved 90.0%)");
        assert_eq!(lines[totals + 4], "    initial load: 48.83 KB");
        assert_eq!(lines[totals + 5], "    worst case: 244.14 KB");
    }

    #[test]
    fn report_unknown_original() {
        let mut result = sample_result();
        result.original_bytes = None;
        for t in &mut result.tiers {
            t.savings = savings(None, t.bytes);
        }
        let results = vec![result];
        let lines = format_derive_report(&report_for(&results), &results, &[]);
        assert_eq!(lines[2], "    original: unknown");
        assert!(lines[3].ends_with("(saved n/a)"));
    }

    #[test]
    fn report_totals_flag_unmeasured_originals() {
        let mut unknown = sample_result();
        unknown.filename = "b.jpg".into();
        unknown.original_bytes = None;
        let results = vec![sample_result(), unknown];
        let lines = format_derive_report(&report_for(&results), &results, &[]);

        let totals = lines.iter().position(|l| l == "Totals (2 images)").unwrap();
        assert_eq!(
            lines[totals + 1],
            "    original: 1.91 MB (1 image unmeasured, excluded from savings)"
        );
        // Savings come from a.jpg alone
        assert_eq!(lines[totals + 2], "    thumbnails: 97.66 KB (saved 97.5%)");
    }

    #[test]
    fn report_lists_failures() {
        let failures = vec![(
            "corrupt.jpg".to_string(),
            FileError::Imaging(BackendError::ProcessingFailed("bad".into())),
        )];
        let lines = format_derive_report(&report_for(&[]), &[], &failures);
        assert_eq!(lines.last().unwrap(), "Failed (1): corrupt.jpg");
    }

    #[test]
    fn geometry_outcomes_split_written_and_failed() {
        let outcomes = vec![
            GeometryOutcome::Written(WrittenFile {
                file: "favicon-16x16.png".into(),
                path: PathBuf::from("/x/favicon-16x16.png"),
                geometry: (16, 16),
                bytes: 1045,
            }),
            GeometryOutcome::Failed {
                file: "apple-touch-icon.png".into(),
                error: GeometryError::Imaging(BackendError::ProcessingFailed("boom".into())),
            },
        ];
        assert_eq!(
            format_geometry_outcomes(&outcomes),
            vec!["favicon-16x16.png 16x16 (1.02 KB)"]
        );
        assert_eq!(
            format_geometry_failures(&outcomes),
            vec!["error: apple-touch-icon.png: Processing failed: boom"]
        );
    }

    #[test]
    fn skipped_event_is_a_warning() {
        let event = DeriveEvent::Skipped {
            path: "/p/dangling.jpg".into(),
            reason: "No such file or directory".into(),
        };
        assert!(is_diagnostic(&event));
        assert_eq!(
            format_derive_event(&event),
            vec!["warning: /p/dangling.jpg: skipped (No such file or directory)"]
        );
    }

    #[test]
    fn check_output_lists_sources() {
        let report = CheckReport {
            sources: vec![
                SourceCheck {
                    filename: "a.jpg".into(),
                    dimensions: Ok((2000, 1500)),
                },
                SourceCheck {
                    filename: "corrupt.jpg".into(),
                    dimensions: Err(BackendError::ProcessingFailed("bad".into())),
                },
            ],
            skipped: vec![SkippedEntry {
                path: PathBuf::from("/p/dangling.jpg"),
                reason: "broken link".into(),
            }],
        };
        assert_eq!(
            format_check_output(&report),
            vec!["Sources (2 images)", "    a.jpg 2000x1500", "    corrupt.jpg unreadable"]
        );
        assert_eq!(
            format_check_failures(&report),
            vec![
                "warning: /p/dangling.jpg: skipped (broken link)",
                "error: corrupt.jpg: Processing failed: bad",
            ]
        );
    }
}
