//! # ql-math
//!
//! Mathematical utilities used by the finite-difference engines: the
//! nalgebra-backed [`Array`], the normal distribution (via statrs), 1-D
//! interpolation with a natural cubic spline, and a Brent root finder.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Array`: grid and value vectors.
pub mod array;

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use distributions::{normal_cdf, normal_pdf};
pub use interpolations::{CubicNaturalSpline, Interpolation1D};
pub use solvers1d::brent;
