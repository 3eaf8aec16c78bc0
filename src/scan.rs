//! Source image discovery.
//!
//! The gallery source directory is flat: every regular file directly inside
//! it whose extension is accepted and whose name does not start with `.`
//! becomes a [`SourceImage`]. Subdirectories are ignored.
//!
//! Results are sorted by file name, which fixes the report order regardless
//! of the order in which parallel units finish.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {0}")]
    SourceDirMissing(PathBuf),
    #[error("Failed to read source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One qualifying source painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// File name inside the source directory; also the output file name in every tier.
    pub filename: String,
    pub path: PathBuf,
}

/// Whether a file name qualifies as a gallery source.
///
/// Hidden files (leading `.`) are rejected; the extension is compared
/// case-insensitively against `extensions`.
pub fn is_accepted(filename: &str, extensions: &[String]) -> bool {
    if filename.starts_with('.') {
        return false;
    }
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// A directory entry that could not be considered as a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of listing the source directory.
#[derive(Debug, Default)]
pub struct SourceListing {
    /// Qualifying sources, sorted by file name.
    pub images: Vec<SourceImage>,
    /// Broken symlinks, unreadable entries and non-UTF-8 names.
    pub skipped: Vec<SkippedEntry>,
}

/// List qualifying images directly inside `dir`, sorted by file name.
///
/// Symlinks are followed, so a linked painting is processed like a regular
/// file. Entries that cannot be read are returned in
/// [`SourceListing::skipped`] rather than aborting the scan; only a failure
/// to read `dir` itself is an error.
pub fn scan_sources(dir: &Path, extensions: &[String]) -> Result<SourceListing, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::SourceDirMissing(dir.to_path_buf()));
    }

    let mut listing = SourceListing::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                listing.skipped.push(SkippedEntry {
                    path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str() else {
            listing.skipped.push(SkippedEntry {
                path: entry.path().to_path_buf(),
                reason: "file name is not valid UTF-8".to_string(),
            });
            continue;
        };
        if is_accepted(filename, extensions) {
            listing.images.push(SourceImage {
                filename: filename.to_string(),
                path: entry.path().to_path_buf(),
            });
        }
    }
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["jpg".into(), "jpeg".into(), "png".into()]
    }

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert!(is_accepted("dawn.jpg", &exts()));
        assert!(is_accepted("dawn.JPG", &exts()));
        assert!(is_accepted("dawn.Jpeg", &exts()));
        assert!(is_accepted("dawn.PNG", &exts()));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_accepted("dawn.gif", &exts()));
        assert!(!is_accepted("notes.txt", &exts()));
        assert!(!is_accepted("noext", &exts()));
    }

    #[test]
    fn rejects_hidden_files() {
        assert!(!is_accepted(".dawn.jpg", &exts()));
        assert!(!is_accepted("._dawn.jpg", &exts()));
    }

    #[test]
    fn scan_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.png", "a.jpg", "b.JPEG", ".hidden.jpg", "readme.md"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        fs::create_dir(tmp.path().join("sub.jpg")).unwrap();

        let images = scan_sources(tmp.path(), &exts()).unwrap().images;
        let names: Vec<&str> = images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.png"]);
        assert_eq!(images[0].path, tmp.path().join("a.jpg"));
    }

    #[test]
    fn scan_does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/deep.jpg"), b"x").unwrap();

        let listing = scan_sources(tmp.path(), &exts()).unwrap();
        assert!(listing.images.is_empty());
        assert!(listing.skipped.is_empty());
    }

    #[test]
    fn scan_missing_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_sources(&tmp.path().join("nope"), &exts());
        assert!(matches!(result, Err(ScanError::SourceDirMissing(_))));
    }

    #[cfg(unix)]
    #[test]
    fn scan_follows_symlinked_sources() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = tmp.path().join("elsewhere");
        let sources = tmp.path().join("paintings");
        fs::create_dir_all(&elsewhere).unwrap();
        fs::create_dir_all(&sources).unwrap();
        fs::write(elsewhere.join("real.jpg"), b"x").unwrap();
        std::os::unix::fs::symlink(elsewhere.join("real.jpg"), sources.join("linked.jpg"))
            .unwrap();

        let listing = scan_sources(&sources, &exts()).unwrap();
        let names: Vec<&str> = listing.images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["linked.jpg"]);
        assert!(listing.skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn scan_reports_broken_symlink() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone.jpg"), tmp.path().join("dangling.jpg"))
            .unwrap();

        let listing = scan_sources(tmp.path(), &exts()).unwrap();
        assert_eq!(listing.images.len(), 1);
        assert_eq!(listing.skipped.len(), 1);
        assert_eq!(listing.skipped[0].path, tmp.path().join("dangling.jpg"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn scan_reports_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.jpg");
        fs::write(tmp.path().join(name), b"x").unwrap();

        let listing = scan_sources(tmp.path(), &exts()).unwrap();
        assert!(listing.images.is_empty());
        assert_eq!(listing.skipped.len(), 1);
        assert!(listing.skipped[0].reason.contains("UTF-8"));
    }
}
