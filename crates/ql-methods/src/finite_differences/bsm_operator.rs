//! Black-Scholes-Merton operator on a logarithmic grid.
//!
//! With `x = ln S` the pricing PDE reads `∂V/∂t + L V = 0` where
//!
//!   `L = ½σ² ∂²/∂x² + (r − q − ½σ²) ∂/∂x − r`.
//!
//! The coefficients are constant, so on a uniform `x` grid every interior row
//! of the central-difference discretisation is the same.  Edge rows are
//! filled in the same way and are expected to be replaced by boundary
//! conditions.

use ql_core::{ensure, errors::Result, Rate, Real, Volatility};
use ql_math::Array;

use super::TridiagonalOperator;

const UNIFORMITY_TOLERANCE: Real = 1.0e-8;

/// Discretise `L` on `grid`, whose nodes must be log-uniformly spaced.
pub fn bsm_operator(
    grid: &Array,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
) -> Result<TridiagonalOperator> {
    let n = grid.size();
    ensure!(n >= 3, "BSM operator needs at least 3 grid points, got {n}");
    ensure!(grid[0] > 0.0, "log grid must be positive, first node is {}", grid[0]);
    let x: Vec<Real> = grid.iter().map(|s| s.ln()).collect();
    let dx = (x[n - 1] - x[0]) / (n - 1) as Real;
    ensure!(dx > 0.0, "grid must be increasing");
    ensure!(
        x.windows(2)
            .all(|w| ((w[1] - w[0]) - dx).abs() <= UNIFORMITY_TOLERANCE * dx.max(1.0)),
        "grid is not uniformly spaced in log space"
    );

    let sigma2 = volatility * volatility;
    let nu = risk_free_rate - dividend_yield - 0.5 * sigma2;
    let lower = 0.5 * sigma2 / (dx * dx) - nu / (2.0 * dx);
    let diag = -sigma2 / (dx * dx) - risk_free_rate;
    let upper = 0.5 * sigma2 / (dx * dx) + nu / (2.0 * dx);

    let mut op = TridiagonalOperator::new(n);
    op.set_first_row(diag, upper);
    op.set_mid_rows(lower, diag, upper);
    op.set_last_row(lower, diag);
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::log_grid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_is_discounted_at_the_risk_free_rate() {
        let grid = log_grid(50.0, 200.0, 21).unwrap();
        let op = bsm_operator(&grid, 0.05, 0.02, 0.3).unwrap();
        let lv = op.apply(&Array::from_fn(21, |_| 1.0)).unwrap();
        for i in 1..20 {
            assert_abs_diff_eq!(lv[i], -0.05, epsilon = 1e-10);
        }
    }

    #[test]
    fn forward_drifts_at_the_dividend_yield() {
        // L S = −q S holds to second order in dx.
        let grid = log_grid(80.0, 125.0, 401).unwrap();
        let op = bsm_operator(&grid, 0.05, 0.02, 0.3).unwrap();
        let lv = op.apply(&grid).unwrap();
        for i in 1..400 {
            assert_abs_diff_eq!(lv[i] / grid[i], -0.02, epsilon = 1e-4);
        }
    }

    #[test]
    fn rejects_non_log_uniform_grid() {
        let grid = Array::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert!(bsm_operator(&grid, 0.05, 0.0, 0.2).is_err());
    }
}
