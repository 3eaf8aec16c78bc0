//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging `paintshop.toml`. Stock defaults
//! are serialized to a TOML table and the user file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! By default `paintshop.toml` is read from the site root (`--root`). All
//! paths inside it are relative to that root.
//!
//! ```text
//! site/
//! ├── paintshop.toml
//! └── images/
//!     ├── logo.png                 # favicon source
//!     ├── paintings/               # gallery sources
//!     ├── originals/               # ← backups
//!     ├── thumbs/                  # ← 600px tier
//!     └── optimized/               # ← 1200px tier
//! ```
//!
//! ## Tiers
//!
//! `[[gallery.tiers]]` is an ordered list. A tier without `max_width` is a
//! verbatim backup copy; a tier with `max_width` is a bound-fit JPEG
//! re-encode. Arrays replace the stock value wholesale, so overriding tiers
//! means listing all of them.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Default config file name inside the site root.
pub const CONFIG_FILENAME: &str = "paintshop.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete pipeline configuration.
///
/// Built once at the entry point and passed by reference everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Gallery derivative tiers and source selection.
    pub gallery: GalleryConfig,
    /// Favicon set and web app manifest.
    pub favicons: FaviconsConfig,
    /// Social-sharing image.
    pub og_image: OgImageConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl PortfolioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gallery.validate()?;
        self.favicons.validate()?;
        self.og_image.validate()?;
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_quality(field: &str, quality: u32) -> Result<(), ConfigError> {
    if !(1..=100).contains(&quality) {
        return Err(invalid(format!("{field} must be 1-100")));
    }
    Ok(())
}

// =============================================================================
// Gallery
// =============================================================================

/// Gallery derivative settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory holding the source paintings (flat, not recursed).
    pub source_dir: String,
    /// Directory the tier directories are created under.
    pub output_root: String,
    /// Accepted extensions, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Output tiers, processed in order.
    pub tiers: Vec<TierConfig>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source_dir: "images/paintings".to_string(),
            output_root: "images".to_string(),
            extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            tiers: vec![
                TierConfig {
                    label: "originals".to_string(),
                    dir: "originals".to_string(),
                    max_width: None,
                    quality: default_quality(),
                },
                TierConfig {
                    label: "thumbnails".to_string(),
                    dir: "thumbs".to_string(),
                    max_width: Some(600),
                    quality: 85,
                },
                TierConfig {
                    label: "optimized".to_string(),
                    dir: "optimized".to_string(),
                    max_width: Some(1200),
                    quality: 90,
                },
            ],
        }
    }
}

impl GalleryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(invalid("gallery.extensions must not be empty"));
        }
        if self.tiers.is_empty() {
            return Err(invalid("gallery.tiers must not be empty"));
        }
        let mut labels = HashSet::new();
        let mut dirs = HashSet::new();
        for tier in &self.tiers {
            if tier.label.is_empty() || tier.dir.is_empty() {
                return Err(invalid("gallery.tiers entries need a label and a dir"));
            }
            if !labels.insert(tier.label.as_str()) {
                return Err(invalid(format!(
                    "gallery.tiers label '{}' is duplicated",
                    tier.label
                )));
            }
            if !dirs.insert(tier.dir.as_str()) {
                return Err(invalid(format!(
                    "gallery.tiers dir '{}' is used by more than one tier",
                    tier.dir
                )));
            }
            if tier.max_width == Some(0) {
                return Err(invalid(format!(
                    "gallery.tiers '{}' max_width must be non-zero",
                    tier.label
                )));
            }
            validate_quality(&format!("gallery.tiers '{}' quality", tier.label), tier.quality)?;
            if normalize_path(&Path::new(&self.output_root).join(&tier.dir))
                == normalize_path(Path::new(&self.source_dir))
            {
                return Err(invalid(format!(
                    "gallery.tiers '{}' writes into gallery.source_dir '{}'",
                    tier.label, self.source_dir
                )));
            }
        }
        Ok(())
    }

    /// Resolved tier list for a site root.
    pub fn resolve_tiers(&self, root: &Path) -> Vec<Tier> {
        let output_root = root.join(&self.output_root);
        self.tiers
            .iter()
            .map(|t| Tier {
                label: t.label.clone(),
                dir: output_root.join(&t.dir),
                kind: match t.max_width {
                    None => TierKind::Backup,
                    Some(max_width) => TierKind::BoundFit {
                        max_width,
                        quality: Quality::new(t.quality),
                    },
                },
            })
            .collect()
    }
}

/// Lexically clean a path: drop `.` and fold `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// One `[[gallery.tiers]]` entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Name shown in the report.
    pub label: String,
    /// Directory name under `gallery.output_root`.
    pub dir: String,
    /// Upper bound on output width. Absent → verbatim backup copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    /// JPEG quality for bound-fit tiers.
    #[serde(default = "default_quality")]
    pub quality: u32,
}

fn default_quality() -> u32 {
    Quality::default().value()
}

/// A tier with its directory resolved against the site root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub label: String,
    pub dir: PathBuf,
    pub kind: TierKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierKind {
    /// Byte-for-byte copy of the source.
    Backup,
    /// Aspect-preserving re-encode bounded by width; never enlarges.
    BoundFit { max_width: u32, quality: Quality },
}

// =============================================================================
// Favicons
// =============================================================================

/// Favicon set settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaviconsConfig {
    /// Source image for every icon.
    pub source: String,
    /// Directory all icons and the manifest are written to.
    pub output_dir: String,
    /// PNG icons, each cover-cropped to its exact geometry.
    pub icons: Vec<IconConfig>,
    pub ico: IcoConfig,
    pub manifest: WebManifestConfig,
}

impl Default for FaviconsConfig {
    fn default() -> Self {
        let icon = |file: &str, size: u32| IconConfig {
            file: file.to_string(),
            width: size,
            height: size,
        };
        Self {
            source: "images/logo.png".to_string(),
            output_dir: "images".to_string(),
            icons: vec![
                icon("favicon-16x16.png", 16),
                icon("favicon-32x32.png", 32),
                icon("apple-touch-icon.png", 180),
                icon("android-chrome-192x192.png", 192),
                icon("android-chrome-512x512.png", 512),
            ],
            ico: IcoConfig::default(),
            manifest: WebManifestConfig::default(),
        }
    }
}

impl FaviconsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for icon in &self.icons {
            if icon.width == 0 || icon.height == 0 {
                return Err(invalid(format!(
                    "favicons.icons '{}' dimensions must be non-zero",
                    icon.file
                )));
            }
        }
        if self.ico.sizes.iter().any(|&s| s == 0 || s > 256) {
            return Err(invalid("favicons.ico.sizes must be 1-256"));
        }
        let m = &self.manifest;
        if m.theme_color.is_empty() || m.background_color.is_empty() {
            return Err(invalid("favicons.manifest colors must not be empty"));
        }
        Ok(())
    }
}

/// One exact-geometry PNG icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconConfig {
    pub file: String,
    pub width: u32,
    pub height: u32,
}

/// Multi-resolution `favicon.ico`. An empty `sizes` list skips the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IcoConfig {
    pub file: String,
    pub sizes: Vec<u32>,
}

impl Default for IcoConfig {
    fn default() -> Self {
        Self {
            file: "favicon.ico".to_string(),
            sizes: vec![16, 32, 48],
        }
    }
}

/// Web app manifest written next to the icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebManifestConfig {
    pub file: String,
    pub name: String,
    pub short_name: String,
    pub theme_color: String,
    pub background_color: String,
    pub display: String,
    /// Icons whose shorter side is at least this many pixels are listed.
    pub min_icon_size: u32,
}

impl Default for WebManifestConfig {
    fn default() -> Self {
        Self {
            file: "site.webmanifest".to_string(),
            name: "Art Portfolio".to_string(),
            short_name: "Portfolio".to_string(),
            theme_color: "#1a1a1a".to_string(),
            background_color: "#ffffff".to_string(),
            display: "standalone".to_string(),
            min_icon_size: 192,
        }
    }
}

// =============================================================================
// OG image
// =============================================================================

/// Social-sharing (Open Graph) image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgImageConfig {
    pub source: String,
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub quality: u32,
}

impl Default for OgImageConfig {
    fn default() -> Self {
        Self {
            source: "images/paintings/featured.jpg".to_string(),
            output: "images/og-image.jpg".to_string(),
            width: 1200,
            height: 630,
            quality: 90,
        }
    }
}

impl OgImageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("og_image dimensions must be non-zero"));
        }
        if self.width > u16::MAX as u32 || self.height > u16::MAX as u32 {
            return Err(invalid("og_image dimensions must be at most 65535"));
        }
        validate_quality("og_image.quality", self.quality)
    }
}

// =============================================================================
// Processing
// =============================================================================

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PortfolioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PortfolioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PortfolioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<PortfolioConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `paintshop.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Paintshop Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to --root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Gallery derivatives
# ---------------------------------------------------------------------------
[gallery]
# Flat directory of source paintings. Files starting with "." are skipped.
source_dir = "images/paintings"

# Tier directories are created under this directory.
output_root = "images"

# Accepted source extensions (case-insensitive).
extensions = ["jpg", "jpeg", "png"]

# Output tiers, in order. Without max_width a tier is a verbatim backup.
# With max_width the source is re-encoded as a progressive JPEG no wider
# than max_width; smaller sources are never enlarged.
# Overriding tiers replaces the whole list.
[[gallery.tiers]]
label = "originals"
dir = "originals"

[[gallery.tiers]]
label = "thumbnails"
dir = "thumbs"
max_width = 600
quality = 85

[[gallery.tiers]]
label = "optimized"
dir = "optimized"
max_width = 1200
quality = 90

# ---------------------------------------------------------------------------
# Favicons
# ---------------------------------------------------------------------------
[favicons]
source = "images/logo.png"
output_dir = "images"

# Each icon is scaled to cover its exact geometry and center-cropped.
[[favicons.icons]]
file = "favicon-16x16.png"
width = 16
height = 16

[[favicons.icons]]
file = "favicon-32x32.png"
width = 32
height = 32

[[favicons.icons]]
file = "apple-touch-icon.png"
width = 180
height = 180

[[favicons.icons]]
file = "android-chrome-192x192.png"
width = 192
height = 192

[[favicons.icons]]
file = "android-chrome-512x512.png"
width = 512
height = 512

# Multi-resolution ICO container. Empty sizes skips the file.
[favicons.ico]
file = "favicon.ico"
sizes = [16, 32, 48]

# Web app manifest. Icons with a shorter side >= min_icon_size are listed.
[favicons.manifest]
file = "site.webmanifest"
name = "Art Portfolio"
short_name = "Portfolio"
theme_color = "#1a1a1a"
background_color = "#ffffff"
display = "standalone"
min_icon_size = 192

# ---------------------------------------------------------------------------
# Social-sharing image
# ---------------------------------------------------------------------------
[og_image]
source = "images/paintings/featured.jpg"
output = "images/og-image.jpg"
width = 1200
height = 630
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
