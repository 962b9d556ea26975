//! Deterministic float ordering.
//!
//! Used wherever floats decide a winner (nearest cluster, closest pick) so
//! ties and NaNs resolve the same way on every run.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Index of the smallest key, first occurrence winning ties.
pub fn argmin_by_key<T>(items: &[T], mut key: impl FnMut(&T) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        best = match best {
            Some((_, bk)) if stable_total_cmp_f64(k, bk).is_ge() => best,
            _ => Some((idx, k)),
        };
    }
    best.map(|(idx, _)| idx)
}
