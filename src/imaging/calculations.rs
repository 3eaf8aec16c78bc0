//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the output dimensions of a width-bounded resize.
///
/// Sources at or below `max_width` keep their dimensions; wider sources are
/// scaled so the width equals `max_width` exactly and the height follows the
/// source aspect ratio (never below 1px).
///
/// # Examples
/// ```
/// # use paintshop::imaging::calculate_bound_fit;
/// // 2000x1500 bounded to 600 → 600x450
/// assert_eq!(calculate_bound_fit((2000, 1500), 600), (600, 450));
///
/// // 300x400 bounded to 600 → unchanged
/// assert_eq!(calculate_bound_fit((300, 400), 600), (300, 400));
/// ```
pub fn calculate_bound_fit(source: (u32, u32), max_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w <= max_width {
        return (src_w, src_h);
    }
    let h = (src_h as f64 * max_width as f64 / src_w as f64).round() as u32;
    (max_width, h.max(1))
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = ((h as f64 * src_aspect).round() as u32).max(tgt_w);
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = ((w as f64 / src_aspect).round() as u32).max(tgt_h);
        (w, h)
    }
}

/// Top-left offset that centers a `target` crop inside `filled`.
///
/// Odd leftovers put the extra pixel on the right/bottom.
pub fn calculate_center_crop_offset(filled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    (
        filled.0.saturating_sub(target.0) / 2,
        filled.1.saturating_sub(target.1) / 2,
    )
}
