//! Size accounting for gallery derivatives.
//!
//! Everything here is pure: per-tier savings, binary byte formatting, and
//! the fold of successful [`ProcessingResult`]s into an [`AggregateReport`].
//!
//! ## Savings
//!
//! `(1 − derived/original) × 100`, rounded to one decimal. An original of
//! zero bytes, or one whose size could not be measured, has no meaningful
//! ratio and reports [`Savings::NotApplicable`] (printed as `n/a`).

use crate::config::{Tier, TierKind};
use crate::derive::ProcessingResult;
use std::fmt;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Fractional size reduction of a derivative relative to its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Savings {
    /// Percent saved, one decimal. Negative when the derivative is larger.
    Percent(f64),
    /// Original size is zero or unknown.
    NotApplicable,
}

impl fmt::Display for Savings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Savings::Percent(p) => write!(f, "{:.1}%", p),
            Savings::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Compute savings of `derived` bytes against an `original` size.
pub fn savings(original: Option<u64>, derived: u64) -> Savings {
    match original {
        Some(orig) if orig > 0 => {
            let pct = (1.0 - derived as f64 / orig as f64) * 100.0;
            Savings::Percent((pct * 10.0).round() / 10.0)
        }
        _ => Savings::NotApplicable,
    }
}

/// Format a byte count on a 1024-based scale.
///
/// ```
/// # use paintshop::report::format_bytes;
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(512), "512 Bytes");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// assert_eq!(format_bytes(2 * 1024 * 1024), "2.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KB {
        format!("{} Bytes", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Batch total for one resize tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTotal {
    pub label: String,
    pub bytes: u64,
    pub savings: Savings,
}

/// Totals across every successful result of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub files: usize,
    /// Sum of measured original sizes.
    pub original_bytes: u64,
    /// Results whose original size could not be measured. They count toward
    /// tier byte totals but not toward aggregate savings.
    pub unmeasured: usize,
    /// One entry per resize tier, in tier order. Backup tiers are omitted;
    /// they equal the originals.
    pub tiers: Vec<TierTotal>,
    /// What a visitor downloads to see the grid: the first resize tier.
    pub initial_load: u64,
    /// Every resize tier of every painting.
    pub worst_case: u64,
}

impl AggregateReport {
    /// Fold results into totals for the given tier list.
    ///
    /// Aggregate savings compare like with like: a tier's savings use only
    /// the results whose original was measured, on both sides of the ratio.
    pub fn from_results(tiers: &[Tier], results: &[ProcessingResult]) -> Self {
        let original_bytes: u64 = results.iter().filter_map(|r| r.original_bytes).sum();
        let unmeasured = results.iter().filter(|r| r.original_bytes.is_none()).count();

        let totals: Vec<TierTotal> = tiers
            .iter()
            .filter(|t| matches!(t.kind, TierKind::BoundFit { .. }))
            .map(|tier| {
                let tier_bytes = |r: &ProcessingResult| -> u64 {
                    r.tiers
                        .iter()
                        .filter(|tr| tr.label == tier.label)
                        .map(|tr| tr.bytes)
                        .sum()
                };
                let bytes: u64 = results.iter().map(tier_bytes).sum();
                let measured_bytes: u64 = results
                    .iter()
                    .filter(|r| r.original_bytes.is_some())
                    .map(tier_bytes)
                    .sum();
                TierTotal {
                    label: tier.label.clone(),
                    bytes,
                    savings: savings(Some(original_bytes), measured_bytes),
                }
            })
            .collect();

        let initial_load = totals.first().map(|t| t.bytes).unwrap_or(0);
        let worst_case = totals.iter().map(|t| t.bytes).sum();

        Self {
            files: results.len(),
            original_bytes,
            unmeasured,
            tiers: totals,
            initial_load,
            worst_case,
        }
    }
}
