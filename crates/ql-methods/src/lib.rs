//! # ql-methods
//!
//! Finite-difference building blocks for one-factor Black-Scholes-Merton
//! pricing on a logarithmic asset grid.
//!
//! The tridiagonal operator and its Thomas solver, Neumann boundary
//! conditions, the BSM operator in log space, a Crank-Nicolson model with
//! step conditions, and grid construction helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods: operators, boundary conditions, rollback.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    bsm_operator, first_derivative_at_center, log_grid, safe_grid_points,
    second_derivative_at_center, value_at_center, AmericanCondition, BoundarySide,
    FiniteDifferenceModel, GridBounds, NeumannBoundary, ShoutCondition, StepCondition,
    TridiagonalOperator,
};
