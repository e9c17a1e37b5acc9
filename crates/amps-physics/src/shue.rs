//! Shue et al. (1998) empirical magnetopause.
//!
//! The boundary is `r(theta) = r0 * (2 / (1 + cos theta))^alpha` with the
//! standoff distance `r0` (Earth radii) and flaring exponent `alpha`
//! regressed on IMF Bz (nT) and solar-wind dynamic pressure (nPa).

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{PhysicsError, PhysicsResult};

pub const R0_RANGE_RE: RangeInclusive<f64> = 4.0..=15.0;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.3..=0.9;

/// Standoff distance and flaring of the magnetopause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShueParams {
    pub r0_re: f64,
    pub alpha: f64,
}

impl ShueParams {
    /// Radial distance (RE) of the boundary at angle `theta_rad` from the Sun-Earth line.
    pub fn radius(&self, theta_rad: f64) -> f64 {
        shue_radius(self.r0_re, self.alpha, theta_rad)
    }
}

fn clamp_or(v: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if v.is_nan() {
        fallback
    } else {
        v.clamp(*range.start(), *range.end())
    }
}

/// Regress `r0` and `alpha` from IMF Bz and dynamic pressure.
///
/// Pressures that are zero, negative or non-finite are replaced by the
/// smallest positive value, so the standoff clamps to its upper bound.
pub fn shue_params(bz_nt: f64, pdyn_npa: f64) -> ShueParams {
    let pdyn = if pdyn_npa.is_finite() && pdyn_npa > 0.0 {
        pdyn_npa
    } else {
        f64::MIN_POSITIVE
    };
    let bz = if bz_nt.is_finite() { bz_nt } else { 0.0 };

    let r0 = (10.22 + 1.29 * (0.184 * (bz + 8.14)).tanh()) * pdyn.powf(-1.0 / 6.6);
    let alpha = (0.58 - 0.007 * bz) * (1.0 + 0.024 * pdyn.ln());

    ShueParams {
        r0_re: clamp_or(r0, &R0_RANGE_RE, *R0_RANGE_RE.end()),
        alpha: clamp_or(alpha, &ALPHA_RANGE, *ALPHA_RANGE.start()),
    }
}

/// `r(theta)` in Earth radii. Diverges towards theta = 180 degrees.
pub fn shue_radius(r0_re: f64, alpha: f64, theta_rad: f64) -> f64 {
    r0_re * (2.0 / (1.0 + theta_rad.cos())).powf(alpha)
}

/// Sample the boundary as `(x, rho)` pairs in Earth radii, with `x` along
/// the Sun-Earth line and `rho` the cylindrical distance from it.
///
/// `theta_max_deg` must lie in (0, 180); `n` points are spaced evenly in theta.
pub fn boundary_curve(
    params: ShueParams,
    theta_max_deg: f64,
    n: usize,
) -> PhysicsResult<Vec<(f64, f64)>> {
    if !(theta_max_deg > 0.0 && theta_max_deg < 180.0) {
        return Err(PhysicsError::NonPhysical {
            what: "theta_max_deg",
            value: theta_max_deg,
        });
    }
    if n < 2 {
        return Ok(vec![(params.r0_re, 0.0)]);
    }
    let step = theta_max_deg.to_radians() / (n - 1) as f64;
    Ok((0..n)
        .map(|i| {
            let theta = step * i as f64;
            let r = params.radius(theta);
            (r * theta.cos(), r * theta.sin())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_wind() {
        let p = shue_params(0.0, 2.0);
        assert!((p.r0_re - 10.2519).abs() < 1e-3, "r0 {}", p.r0_re);
        assert!((p.alpha - 0.5896).abs() < 1e-3, "alpha {}", p.alpha);
    }

    #[test]
    fn storm_compression() {
        let p = shue_params(-10.0, 3.5);
        assert!((p.r0_re - 8.1016).abs() < 1e-3);
        assert!((p.alpha - 0.6695).abs() < 1e-3);
    }

    #[test]
    fn vanishing_pressure_clamps() {
        let p = shue_params(0.0, 0.0);
        assert_eq!(p.r0_re, 15.0);
        assert_eq!(p.alpha, 0.3);
    }

    #[test]
    fn subsolar_point_is_r0() {
        let p = shue_params(-5.0, 4.0);
        assert!((p.radius(0.0) - p.r0_re).abs() < 1e-12);
    }

    #[test]
    fn curve_starts_on_axis() {
        let p = shue_params(0.0, 2.0);
        let pts = boundary_curve(p, 120.0, 25).unwrap();
        assert_eq!(pts.len(), 25);
        assert!((pts[0].0 - p.r0_re).abs() < 1e-12);
        assert_eq!(pts[0].1, 0.0);
        assert!(pts[24].0 < 0.0);
    }

    #[test]
    fn curve_rejects_antisunward_limit() {
        let p = shue_params(0.0, 2.0);
        assert!(boundary_curve(p, 180.0, 10).is_err());
    }
}
