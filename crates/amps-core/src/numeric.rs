use crate::AmpsError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerance matching a value printed with `decimals` fractional digits.
    pub fn for_decimals(decimals: usize) -> Self {
        Self {
            abs: 0.5 * 10f64.powi(-(decimals as i32)) * (1.0 + 1e-9),
            rel: 1e-12,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AmpsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AmpsError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, AmpsError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(AmpsError::InvalidArg { what })
    }
}

/// `n` points spaced evenly in log10 between `lo` and `hi` inclusive.
///
/// Both bounds must be positive with `lo < hi`; `n == 1` yields `[lo]`.
pub fn log_space(lo: Real, hi: Real, n: usize) -> Result<Vec<Real>, AmpsError> {
    let lo = ensure_positive(lo, "log_space lower bound")?;
    let hi = ensure_positive(hi, "log_space upper bound")?;
    if lo >= hi {
        return Err(AmpsError::InvalidArg {
            what: "log_space bounds must satisfy lo < hi",
        });
    }
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![lo]),
        _ => {
            let (a, b) = (lo.log10(), hi.log10());
            let step = (b - a) / (n - 1) as Real;
            Ok((0..n)
                .map(|i| {
                    if i == n - 1 {
                        hi
                    } else {
                        10f64.powf(a + step * i as Real)
                    }
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn decimal_tolerance_accepts_rounding() {
        let tol = Tolerances::for_decimals(2);
        assert!(nearly_equal(3.14159, 3.14, tol));
        assert!(!nearly_equal(3.14159, 3.13, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn log_space_endpoints_exact() {
        let pts = log_space(1.0, 1000.0, 4).unwrap();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], 1.0);
        assert_eq!(pts[3], 1000.0);
        assert!((pts[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn log_space_rejects_bad_bounds() {
        assert!(log_space(0.0, 10.0, 5).is_err());
        assert!(log_space(10.0, 1.0, 5).is_err());
    }
}
