//! 1D root finding with Brent's method.
//!
//! The objective is fallible: each evaluation may itself be a numerical
//! pricing run, so errors from `f` are propagated unchanged.

use ql_core::{errors::Result, Real};

const DEFAULT_ACCURACY: Real = 1.0e-11;

/// Brent's method for a root of `f(x)` bracketed by `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.  At most
/// `max_evaluations` calls to `f` are made.
pub fn brent<F>(
    mut f: F,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_evaluations: usize,
) -> Result<Real>
where
    F: FnMut(Real) -> Result<Real>,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a)?;
    let mut fb = f(b)?;
    let mut evaluations = 2;

    ql_core::ensure!(
        fa * fb <= 0.0,
        "root not bracketed: f({a}) = {fa}, f({b}) = {fb}"
    );
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    while evaluations < max_evaluations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two
            // distinct points are available.
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b)?;
        evaluations += 1;
    }
    ql_core::fail!("Brent solver: maximum number of function evaluations ({max_evaluations}) exceeded")
}
