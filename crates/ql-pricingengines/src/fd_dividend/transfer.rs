//! Moving a value function from one grid onto another.
//!
//! The values are fitted with a natural cubic spline in `ln S` and the spline
//! is sampled at the new nodes.  Old nodes that are not strictly positive
//! have no logarithm and are left out of the fit.  New nodes at or above the
//! second-to-last old node are evaluated there instead of extrapolating past
//! the fitted range.
//!
//! The clamp point is taken from the old (dividend-shifted) grid, not from
//! the new one: every new node past `old[n−2]` reads the spline at
//! `old[n−2]` itself.

use ql_core::{ensure, errors::Error, errors::Result, Real};
use ql_math::{Array, CubicNaturalSpline, Interpolation1D};

/// Resample `prices`, given on `old_grid`, at the nodes of `new_grid`.
///
/// # Errors
/// [`Error::DegenerateInterpolation`] if fewer than two old nodes are
/// strictly positive.  The old grid must be strictly increasing and the new
/// grid strictly positive.
pub fn transfer_prices(prices: &Array, old_grid: &Array, new_grid: &Array) -> Result<Array> {
    let n = old_grid.size();
    ensure!(
        prices.size() == n,
        "price array ({}) and old grid ({n}) differ in size",
        prices.size()
    );
    ensure!(
        old_grid.is_strictly_increasing(),
        "old grid must be strictly increasing"
    );

    let (log_nodes, kept): (Vec<Real>, Vec<Real>) = old_grid
        .iter()
        .zip(prices.iter())
        .filter(|(g, _)| **g > 0.0)
        .map(|(&g, &p)| (g.ln(), p))
        .unzip();
    if log_nodes.len() < 2 {
        return Err(Error::DegenerateInterpolation {
            usable: log_nodes.len(),
        });
    }
    let spline = CubicNaturalSpline::new(&log_nodes, &kept)?;

    let clamp = old_grid[n - 2];
    new_grid
        .iter()
        .map(|&s| {
            let node = if s >= clamp { clamp } else { s };
            ensure!(node > 0.0, "new grid node {s} is not positive");
            Ok(spline.operator(node.ln()))
        })
        .collect()
}
