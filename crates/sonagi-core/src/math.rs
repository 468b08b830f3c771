//! Scalar interpolation helpers.

/// Linear interpolation between `start` and `stop`.
pub fn lerp(start: f32, stop: f32, t: f32) -> f32 {
    start + (stop - start) * t
}

/// Re-map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The result is not clamped. A zero-width input range yields `out_min`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Same as [`map_range`] but the result is kept inside the output range.
pub fn map_range_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let mapped = map_range(value, in_min, in_max, out_min, out_max);
    let (lo, hi) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    mapped.clamp(lo, hi)
}
