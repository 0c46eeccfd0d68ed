//! Finite difference methods for PDE-based option pricing.
//!
//! The 1-D Black-Scholes PDE in log space, rolled back with Crank-Nicolson.
//!
//! # Overview
//!
//! * [`TridiagonalOperator`]: tridiagonal matrix with Thomas-algorithm solver
//! * [`NeumannBoundary`]: fixed edge slopes
//! * [`bsm_operator`]: the BSM generator on a log-uniform grid
//! * [`FiniteDifferenceModel`]: Crank-Nicolson rollback with step conditions
//! * [`StepCondition`]: early-exercise and shout constraints
//! * [`GridBounds`], [`log_grid`]: domain and node placement

mod boundary_condition;
mod bsm_operator;
mod grid;
mod model;
mod step_condition;
mod tridiagonal_operator;

pub use boundary_condition::{BoundarySide, NeumannBoundary};
pub use bsm_operator::bsm_operator;
pub use grid::{
    first_derivative_at_center, log_grid, safe_grid_points, second_derivative_at_center,
    value_at_center, GridBounds,
};
pub use model::FiniteDifferenceModel;
pub use step_condition::{AmericanCondition, ShoutCondition, StepCondition};
pub use tridiagonal_operator::TridiagonalOperator;
