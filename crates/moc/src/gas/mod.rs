//! Prandtl–Meyer function for a calorically perfect gas.
//!
//! - `prandtl_meyer`: ν(M), zero for sonic/subsonic input.
//! - `mach_from_prandtl_meyer`: inverse via safeguarded Newton (bisection fallback).
//! - `max_prandtl_meyer`: the M→∞ limit, upper bound for the inverse.
//!
//! All angles are in radians.

use std::f64::consts::FRAC_PI_2;

use crate::error::{MocError, Result};

/// Absolute residual accepted by the inversion.
const NU_TOL: f64 = 1e-12;
/// Iteration cap for the inversion (bracket expansion excluded).
const MAX_ITER: usize = 100;
/// Largest Mach number the bracket may grow to.
const MACH_CEILING: f64 = 1e12;

#[inline]
fn check_gamma(gamma: f64) -> Result<f64> {
    if gamma.is_finite() && gamma > 1.0 {
        Ok(((gamma + 1.0) / (gamma - 1.0)).sqrt())
    } else {
        Err(MocError::InvalidGamma(gamma))
    }
}

#[inline]
fn nu_unchecked(mach: f64, a: f64) -> f64 {
    if mach <= 1.0 {
        return 0.0;
    }
    let beta = (mach * mach - 1.0).sqrt();
    a * (beta / a).atan() - beta.atan()
}

/// dν/dM for M > 1.
#[inline]
fn nu_slope(mach: f64, gamma: f64) -> f64 {
    let m2 = mach * mach;
    (m2 - 1.0).sqrt() / (mach * (1.0 + 0.5 * (gamma - 1.0) * m2))
}

/// Prandtl–Meyer angle ν(M).
///
/// Pre: `mach > 0`, `gamma > 1`. Post: `ν >= 0`; returns `0` for `M <= 1`.
pub fn prandtl_meyer(mach: f64, gamma: f64) -> Result<f64> {
    let a = check_gamma(gamma)?;
    if !mach.is_finite() || mach <= 0.0 {
        return Err(MocError::InvalidMach(mach));
    }
    Ok(nu_unchecked(mach, a))
}

/// Supremum of ν over all supersonic Mach numbers.
pub fn max_prandtl_meyer(gamma: f64) -> Result<f64> {
    let a = check_gamma(gamma)?;
    Ok(FRAC_PI_2 * (a - 1.0))
}

/// Mach number whose Prandtl–Meyer angle equals `nu`.
///
/// Pre: `0 <= nu < max_prandtl_meyer(gamma)`.
/// Post: `M >= 1` with `|ν(M) − nu| < 1e-12`, or `NoConvergence`.
pub fn mach_from_prandtl_meyer(nu: f64, gamma: f64) -> Result<f64> {
    let a = check_gamma(gamma)?;
    let max = FRAC_PI_2 * (a - 1.0);
    if !nu.is_finite() || nu < 0.0 || nu >= max {
        return Err(MocError::AngleOutOfRange { angle: nu, max });
    }
    if nu == 0.0 {
        return Ok(1.0);
    }

    // Bracket [lo, hi] with ν(lo) <= nu < ν(hi).
    let mut lo = 1.0;
    let mut hi = 2.0;
    while nu_unchecked(hi, a) <= nu {
        lo = hi;
        hi *= 2.0;
        if hi > MACH_CEILING {
            return Err(MocError::NoConvergence {
                angle: nu,
                iterations: 0,
            });
        }
    }

    let mut m = 0.5 * (lo + hi);
    for _ in 0..MAX_ITER {
        let f = nu_unchecked(m, a) - nu;
        if f.abs() < NU_TOL {
            return Ok(m);
        }
        if f < 0.0 {
            lo = m;
        } else {
            hi = m;
        }
        if hi - lo <= f64::EPSILON * hi {
            return Ok(m);
        }
        let slope = nu_slope(m, gamma);
        let newton = m - f / slope;
        m = if slope > 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }
    Err(MocError::NoConvergence {
        angle: nu,
        iterations: MAX_ITER,
    })
}

/// Mach angle μ = asin(1/M) for `M >= 1`.
#[inline]
pub fn mach_angle(mach: f64) -> f64 {
    (1.0 / mach).asin()
}

#[cfg(test)]
mod tests;
