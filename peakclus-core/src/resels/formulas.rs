//! Closed-form angular corrections for Hotelling-type statistics.
//!
//! Each function returns the per-node factor that multiplies the node's
//! resels-per-vertex weight. Ratios are clamped into the domain of the
//! function applied to them: `[0, 1]` when a square root is taken and
//! `[-1, 1]` otherwise, so a negative threshold keeps its negative ratio. An
//! undefined ratio (`0 / 0`, which arises when the node sits exactly at the
//! threshold) is read as `1`, so the node contributes nothing.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Number of angular samples used by [`trivariate_multi_row`].
pub const SPHERE_SAMPLES: u32 = 20;

fn clamp_ratio(value: f64, lower: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(lower, 1.0)
    }
}

fn unit_interval(value: f64) -> f64 {
    clamp_ratio(value, 0.0)
}

fn root_ratio(threshold: f64, t0: f64, df_len: usize) -> f64 {
    let ratio = threshold / t0;
    if df_len > 1 {
        unit_interval(ratio).sqrt()
    } else {
        clamp_ratio(ratio, -1.0)
    }
}

/// Cap ratio `sqrt(max(0, threshold - s) / (t0 - s))`, clamped to `[0, 1]`.
fn cap_ratio(threshold: f64, t0: f64, s: f64) -> f64 {
    unit_interval((threshold - s).max(0.0) / (t0 - s)).sqrt()
}

/// `2·acos((threshold / t0)^(1 / df_len))` for a single-row bivariate map.
///
/// # Examples
/// ```
/// use peakclus_core::resels::bivariate_single_row;
///
/// assert_eq!(bivariate_single_row(4.0, 4.0, 1), 0.0);
/// assert!((bivariate_single_row(0.0, 4.0, 1) - std::f64::consts::PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn bivariate_single_row(threshold: f64, t0: f64, df_len: usize) -> f64 {
    2.0 * root_ratio(threshold, t0, df_len).acos()
}

/// `2·acos(sqrt(max(0, threshold - t1) / (t0 - t1)))` for a multi-row
/// bivariate map.
#[must_use]
pub fn bivariate_multi_row(threshold: f64, t0: f64, t1: f64) -> f64 {
    2.0 * cap_ratio(threshold, t0, t1).acos()
}

/// `2π·(1 - (threshold / t0)^(1 / df_len))` for a single-row trivariate map.
#[must_use]
pub fn trivariate_single_row(threshold: f64, t0: f64, df_len: usize) -> f64 {
    TAU * (1.0 - root_ratio(threshold, t0, df_len))
}

/// Spherical-cap correction for a multi-row trivariate map.
///
/// Averages `1 - cap_ratio` over [`SPHERE_SAMPLES`] angles
/// `θ_i = (i - ½) / 20 · π/2`, where the cap offset is
/// `s_i = cos²θ_i · t1 + sin²θ_i · t2` (the `t2` term only when a third row
/// exists), and scales the mean by `2π`.
#[must_use]
pub fn trivariate_multi_row(threshold: f64, t0: f64, t1: f64, t2: Option<f64>) -> f64 {
    let samples = f64::from(SPHERE_SAMPLES);
    let total: f64 = (1..=SPHERE_SAMPLES)
        .map(|i| {
            let theta = (f64::from(i) - 0.5) / samples * FRAC_PI_2;
            let (sin, cos) = theta.sin_cos();
            let mut s = cos * cos * t1;
            if let Some(t2) = t2 {
                s += sin * sin * t2;
            }
            1.0 - cap_ratio(threshold, t0, s)
        })
        .sum();
    TAU * total / samples
}
