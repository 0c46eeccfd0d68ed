//! Tridiagonal operator with a Thomas-algorithm solver.

use ql_core::{ensure, ensure_post, errors::Result, Real, Size};
use ql_math::Array;

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands. Used for 1-D finite difference
/// discretisations of second-order PDEs.
///
/// Row `i` reads `lower[i]·x[i−1] + diag[i]·x[i] + upper[i]·x[i+1]`, so
/// `lower[0]` and `upper[n−1]` are never used.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: Size) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// The identity of size `n`.
    pub fn identity(n: Size) -> Self {
        let mut op = Self::new(n);
        op.add_identity(1.0);
        op
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> Size {
        self.diag.len()
    }

    /// Overwrite row 0.
    pub fn set_first_row(&mut self, diag: Real, upper: Real) {
        self.diag[0] = diag;
        self.upper[0] = upper;
    }

    /// Overwrite rows `1..n−1` with the same coefficients.
    pub fn set_mid_rows(&mut self, lower: Real, diag: Real, upper: Real) {
        let n = self.size();
        for i in 1..n.saturating_sub(1) {
            self.lower[i] = lower;
            self.diag[i] = diag;
            self.upper[i] = upper;
        }
    }

    /// Overwrite row `n−1`.
    pub fn set_last_row(&mut self, lower: Real, diag: Real) {
        let n = self.size();
        self.lower[n - 1] = lower;
        self.diag[n - 1] = diag;
    }

    /// Apply the operator: `y = A · x`.
    pub fn apply(&self, x: &Array) -> Result<Array> {
        let n = self.size();
        ensure!(
            x.size() == n,
            "array size ({}) does not match operator size ({n})",
            x.size()
        );
        ensure!(n >= 2, "operator needs at least 2 rows, got {n}");
        Ok(Array::from_fn(n, |i| {
            let mut y = self.diag[i] * x[i];
            if i > 0 {
                y += self.lower[i] * x[i - 1];
            }
            if i + 1 < n {
                y += self.upper[i] * x[i + 1];
            }
            y
        }))
    }

    /// Solve `A · x = rhs` with the Thomas algorithm.
    ///
    /// # Errors
    /// A postcondition error if a pivot vanishes, which cannot happen for
    /// the diagonally dominant systems Crank-Nicolson produces.
    pub fn solve_for(&self, rhs: &Array) -> Result<Array> {
        let n = self.size();
        ensure!(
            rhs.size() == n,
            "rhs size ({}) does not match operator size ({n})",
            rhs.size()
        );
        ensure!(n >= 2, "operator needs at least 2 rows, got {n}");

        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];
        let mut pivot = self.diag[0];
        ensure_post!(pivot != 0.0, "zero pivot in row 0");
        c[0] = self.upper[0] / pivot;
        d[0] = rhs[0] / pivot;
        for i in 1..n {
            pivot = self.diag[i] - self.lower[i] * c[i - 1];
            ensure_post!(pivot != 0.0, "zero pivot in row {i}");
            if i + 1 < n {
                c[i] = self.upper[i] / pivot;
            }
            d[i] = (rhs[i] - self.lower[i] * d[i - 1]) / pivot;
        }

        let mut x = d;
        for i in (0..n - 1).rev() {
            x[i] -= c[i] * x[i + 1];
        }
        Ok(Array::from_vec(x))
    }

    /// Scale all entries by a scalar.
    pub fn scale(&mut self, factor: Real) {
        for band in [&mut self.lower, &mut self.diag, &mut self.upper] {
            band.iter_mut().for_each(|v| *v *= factor);
        }
    }

    /// Add the identity matrix scaled by `factor`: `A ← A + factor · I`.
    pub fn add_identity(&mut self, factor: Real) {
        self.diag.iter_mut().for_each(|d| *d += factor);
    }

    /// `I + factor · A`, the building block of theta schemes.
    pub fn identity_plus_scaled(&self, factor: Real) -> Self {
        let mut op = self.clone();
        op.scale(factor);
        op.add_identity(1.0);
        op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn laplacian(n: Size) -> TridiagonalOperator {
        let mut op = TridiagonalOperator::new(n);
        op.set_first_row(-2.0, 1.0);
        op.set_mid_rows(1.0, -2.0, 1.0);
        op.set_last_row(1.0, -2.0);
        op
    }

    #[test]
    fn apply_uses_the_three_bands() {
        let op = laplacian(4);
        let y = op.apply(&Array::from_slice(&[1.0, 4.0, 9.0, 16.0])).unwrap();
        assert_eq!(y.as_slice(), &[2.0, 2.0, 2.0, -23.0]);
    }

    #[test]
    fn identity_is_neutral() {
        let x = Array::from_slice(&[3.0, -1.0, 2.5]);
        let id = TridiagonalOperator::identity(3);
        assert_eq!(id.apply(&x).unwrap(), x);
        assert_eq!(id.solve_for(&x).unwrap(), x);
    }

    #[test]
    fn solve_inverts_apply() {
        let op = laplacian(6).identity_plus_scaled(-0.5);
        let x = Array::from_slice(&[1.0, 0.5, -2.0, 3.0, 0.25, -1.0]);
        let rhs = op.apply(&x).unwrap();
        let solved = op.solve_for(&rhs).unwrap();
        for i in 0..6 {
            assert_abs_diff_eq!(solved[i], x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn identity_plus_scaled_leaves_the_original() {
        let op = laplacian(3);
        let shifted = op.identity_plus_scaled(0.5);
        assert_eq!(shifted.diag, vec![0.0; 3]);
        assert_eq!(shifted.upper[0], 0.5);
        assert_eq!(op, laplacian(3));
    }

    #[test]
    fn zero_pivot_and_size_mismatch_fail() {
        let op = TridiagonalOperator::new(3);
        assert!(op.solve_for(&Array::zeros(3)).is_err());
        assert!(laplacian(3).apply(&Array::zeros(4)).is_err());
        assert!(laplacian(3).solve_for(&Array::zeros(2)).is_err());
    }

    proptest! {
        #[test]
        fn diagonally_dominant_systems_round_trip(
            dt in 1e-4f64..1.0,
            xs in prop::collection::vec(-100.0f64..100.0, 3..40),
        ) {
            let n = xs.len();
            let op = laplacian(n).identity_plus_scaled(-dt);
            let x = Array::from_vec(xs);
            let solved = op.solve_for(&op.apply(&x).unwrap()).unwrap();
            prop_assert!(solved.max_abs_diff(&x) <= 1e-9 * (1.0 + x.iter().fold(0.0f64, |m, v| m.max(v.abs()))));
        }
    }
}
