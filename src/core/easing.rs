//! Easing curves for time-based scroll animation.

/// Linear interpolation between two offsets.
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (end - start).mul_add(t, start)
}

/// Cubic ease-in-out: slow start, fast middle, slow end.
///
/// Input is clamped to `[0, 1]`, so callers may pass raw progress.
#[inline]
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}
