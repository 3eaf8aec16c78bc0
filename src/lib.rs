//! # Paintshop
//!
//! Web-ready image derivatives for an art portfolio site. Three independent
//! jobs share one codec layer:
//!
//! ```text
//! derive     images/paintings/  →  originals/ thumbs/ optimized/  + savings report
//! favicons   images/logo.png    →  favicon PNGs, favicon.ico, site.webmanifest
//! og-image   featured.jpg       →  og-image.jpg (1200x630)
//! ```
//!
//! Source files are only ever read. Every output is written to a tier or
//! favicon directory, never over its input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `paintshop.toml` loading: stock defaults, merge, validation, tier resolution |
//! | [`scan`] | Flat enumeration of qualifying source paintings |
//! | [`derive`] | Per-painting tier fan-out run in parallel; outcome per file |
//! | [`report`] | Savings, byte formatting, and batch totals |
//! | [`fixed`] | Shared render-and-measure unit for exact-geometry outputs |
//! | [`favicon`] | Favicon PNG set, multi-resolution ICO, web manifest |
//! | [`og_image`] | Social-sharing image |
//! | [`imaging`] | Codec seam: `ImageBackend` trait, pure geometry math, `image`-based backend |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Bound-Fit, Never Enlarge
//!
//! Gallery tiers constrain width only. A painting narrower than the tier's
//! bound is re-encoded at its native size, so a tier never invents pixels.
//! The favicon and OG generators are the opposite: they cover-crop to an
//! exact geometry and will enlarge a small source to fill it.
//!
//! ## Progressive JPEG for Every Gallery Tier
//!
//! Thumbnails and optimized tiers are progressive JPEG regardless of the
//! source format, so a grid of thumbnails paints coarse-to-fine. Encoding
//! goes through `jpeg-encoder` because the `image` crate's JPEG encoder is
//! baseline-only. Output files keep the source's filename.
//!
//! ## Isolation Per Unit
//!
//! One corrupt painting, or one icon that fails to encode, is reported and
//! skipped. Only a missing input directory or an unwritable output directory
//! stops a command.

pub mod config;
pub mod derive;
pub mod favicon;
pub mod fixed;
pub mod imaging;
pub mod og_image;
pub mod output;
pub mod report;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
