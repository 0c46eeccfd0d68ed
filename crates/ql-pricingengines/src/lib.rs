//! # ql-pricingengines
//!
//! Pricing engines for vanilla options on an asset paying discrete cash
//! dividends.
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed-form for European options
//! - [`AnalyticDividendEuropeanEngine`]: closed-form on the spot net of discounted dividends
//! - [`FdVanillaEngine`]: finite differences, single period, no dividends
//! - [`FdDividendEngine`]: finite differences across ex-dividend dates with a
//!   control variate

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_dividend_european_engine;
pub mod analytic_european_engine;
pub mod control_variate;
pub mod fd_dividend;
pub mod fd_setup;
pub mod fd_vanilla_engine;
pub mod market;

pub use analytic_dividend_european_engine::{dividend_european, AnalyticDividendEuropeanEngine};
pub use analytic_european_engine::{black_scholes_merton, AnalyticEuropeanEngine, BlackScholesResults};
pub use control_variate::{ControlVariate, CorrectedGreeks};
pub use fd_dividend::{
    ratchet_bounds, transfer_prices, FdDividendEngine, FdDividendOption, FdState,
};
pub use fd_setup::FdSettings;
pub use fd_vanilla_engine::FdVanillaEngine;
pub use market::BlackScholesMarket;
