//! Neumann boundary conditions for tridiagonal evolution.
//!
//! The condition fixes the difference between the two outermost values on
//! one side of the grid: `u[1] − u[0] = value` on the lower side and
//! `u[n−1] − u[n−2] = value` on the upper side.

use ql_core::{ensure, errors::Result, Real};
use ql_math::Array;

use super::TridiagonalOperator;

/// Which edge of the grid a condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    /// Row 0.
    Lower,
    /// Row `n − 1`.
    Upper,
}

/// Fixed first difference at one edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeumannBoundary {
    side: BoundarySide,
    value: Real,
}

impl NeumannBoundary {
    /// Condition on `side` with the given first difference.
    pub fn new(side: BoundarySide, value: Real) -> Self {
        Self { side, value }
    }

    /// Conditions matching the edge slopes of `values`, typically the
    /// payoff sampled on the grid.
    pub fn from_edges(values: &Array) -> Result<[Self; 2]> {
        let n = values.size();
        ensure!(n >= 2, "need at least 2 values to fix edge slopes, got {n}");
        Ok([
            Self::new(BoundarySide::Lower, values[1] - values[0]),
            Self::new(BoundarySide::Upper, values[n - 1] - values[n - 2]),
        ])
    }

    /// The side this condition applies to.
    pub fn side(&self) -> BoundarySide {
        self.side
    }

    /// The imposed first difference.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Restore the condition on an array just produced by `A · u`.
    pub fn apply_after_applying(&self, u: &mut Array) {
        let n = u.size();
        match self.side {
            BoundarySide::Lower => u[0] = u[1] - self.value,
            BoundarySide::Upper => u[n - 1] = u[n - 2] + self.value,
        }
    }

    /// Rewrite the edge row of `op` and the matching entry of `rhs` so that
    /// the solution of `op · u = rhs` satisfies the condition.
    pub fn apply_before_solving(&self, op: &mut TridiagonalOperator, rhs: &mut Array) {
        let n = rhs.size();
        match self.side {
            BoundarySide::Lower => {
                op.set_first_row(-1.0, 1.0);
                rhs[0] = self.value;
            }
            BoundarySide::Upper => {
                op.set_last_row(-1.0, 1.0);
                rhs[n - 1] = self.value;
            }
        }
    }
}
