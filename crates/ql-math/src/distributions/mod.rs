//! Probability distributions.
//!
//! Only the standard normal is needed by the analytic Black-Scholes
//! reference pricers; it delegates to the `statrs` crate.

pub mod normal;

pub use normal::{normal_cdf, normal_pdf};
