//! Natural cubic spline.
//!
//! The spline is C² through the data and has zero second derivative at both
//! ends.  The second derivatives at the interior knots solve a symmetric,
//! diagonally dominant tridiagonal system, so construction is `O(n)`.
//!
//! Each interval `[x_i, x_{i+1}]` is stored in Horner form:
//!
//!   `f(x) = y_i + dx*(a_i + dx*(b_i + dx*c_i))`,  `dx = x − x_i`.
//!
//! Outside `[x_0, x_{n−1}]` the end polynomials are extended.

use ql_core::{errors::Result, Real};

use super::{locate, Interpolation1D};

/// Natural cubic spline interpolation.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Fit a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    /// Fails if fewer than two points are given, the slices differ in
    /// length, or `xs` is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        let n = xs.len();
        ql_core::ensure!(n >= 2, "need at least 2 points for a cubic spline, got {n}");
        ql_core::ensure!(
            n == ys.len(),
            "xs ({n}) and ys ({}) must have the same length",
            ys.len()
        );
        ql_core::ensure!(
            xs.windows(2).all(|w| w[1] > w[0]),
            "spline abscissae must be strictly increasing"
        );

        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Second derivatives; natural ends keep m[0] = m[n-1] = 0.
        let mut m = vec![0.0; n];
        if n > 2 {
            let k = n - 2;
            let mut diag = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            for j in 0..k {
                diag[j] = 2.0 * (h[j] + h[j + 1]);
                rhs[j] = 6.0 * (s[j + 1] - s[j]);
            }
            // Thomas algorithm: sub-diagonal h[j], super-diagonal h[j+1].
            for j in 1..k {
                let w = h[j] / diag[j - 1];
                diag[j] -= w * h[j];
                rhs[j] -= w * rhs[j - 1];
            }
            m[k] = rhs[k - 1] / diag[k - 1];
            for j in (0..k - 1).rev() {
                m[j + 1] = (rhs[j] - h[j + 1] * m[j + 2]) / diag[j];
            }
        }

        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            a.push(s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
            b.push(0.5 * m[i]);
            c.push((m[i + 1] - m[i]) / (6.0 * h[i]));
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            a,
            b,
            c,
        })
    }

    /// First derivative of the spline at `x`.
    pub fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    /// Second derivative of the spline at `x`.
    pub fn second_derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        2.0 * self.b[i] + 6.0 * dx * self.c[i]
    }

    /// Number of knots.
    pub fn size(&self) -> usize {
        self.xs.len()
    }
}

impl Interpolation1D for CubicNaturalSpline {
    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
