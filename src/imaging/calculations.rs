//! Pure calculation functions for letterbox geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Fill, Fit, Placement, TargetBox};

/// Largest dimensions that fit inside `target` while keeping the aspect
/// ratio of `source`.
///
/// The bound axis matches the target exactly; the other axis is rounded
/// half away from zero and never drops below one pixel. The ratio
/// comparison and the rounding are done in integer arithmetic, so the result
/// doesn't depend on float representation.
///
/// # Examples
/// ```
/// # use instamax::imaging::{TargetBox, fit_dimensions};
/// // Landscape: width is bound, bars top and bottom
/// let fit = fit_dimensions((2000, 1000), TargetBox::default());
/// assert_eq!((fit.width, fit.height), (1080, 540));
///
/// // Tall portrait: height is bound, bars on the sides
/// let fit = fit_dimensions((500, 2000), TargetBox::default());
/// assert_eq!((fit.width, fit.height), (338, 1350));
/// ```
pub fn fit_dimensions(source: (u32, u32), target: TargetBox) -> Fit {
    let (src_w, src_h) = (u64::from(source.0), u64::from(source.1));
    let (tgt_w, tgt_h) = (u64::from(target.width), u64::from(target.height));

    // tgt_h / tgt_w < src_h / src_w, cross-multiplied
    if tgt_h * src_w < src_h * tgt_w {
        // Source is relatively taller: height matches, sides get filled
        Fit {
            width: scale_rounded(src_w, tgt_h, src_h),
            height: target.height,
            fill: Fill::Sides,
        }
    } else {
        // Source is relatively wider (or equal): width matches
        Fit {
            width: target.width,
            height: scale_rounded(src_h, tgt_w, src_w),
            fill: Fill::TopBottom,
        }
    }
}

/// `round(value * num / den)`, half away from zero, at least 1.
///
/// Widened to `u128` so any pair of `u32` sizes is representable. The result
/// never exceeds the target side, which is itself a `u32`.
fn scale_rounded(value: u64, num: u64, den: u64) -> u32 {
    let (value, num, den) = (u128::from(value), u128::from(num), u128::from(den));
    let scaled = (2 * value * num + den) / (2 * den);
    u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
}

/// Center a fit inside the target box.
///
/// Uses truncating division on both halves, so an odd leftover pixel ends up
/// on the right or bottom edge. The rectangle's size always equals the fit.
pub fn center_placement(fit: &Fit, target: TargetBox) -> Placement {
    let left = target.width / 2 - fit.width / 2;
    let upper = target.height / 2 - fit.height / 2;
    Placement {
        left,
        upper,
        right: left + fit.width,
        lower: upper + fit.height,
    }
}
