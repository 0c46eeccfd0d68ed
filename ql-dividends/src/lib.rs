//! # ql-dividends
//!
//! Finite-difference pricing of vanilla options on an asset paying a known
//! schedule of discrete cash dividends.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this crate
//! rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use ql_dividends::instruments::{
//!     DividendSchedule, DividendVanillaOption, Exercise, OptionType, PlainVanillaPayoff,
//! };
//! use ql_dividends::pricingengines::{BlackScholesMarket, FdDividendEngine, FdSettings};
//!
//! # fn main() -> ql_dividends::core::Result<()> {
//! let market = BlackScholesMarket::new(100.0, 0.05, 0.0, 0.2)?;
//! let dividends = DividendSchedule::new(vec![2.0, 2.0], vec![0.25, 0.75])?;
//! let option = DividendVanillaOption::new(
//!     Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0)),
//!     Exercise::american(1.0),
//!     dividends,
//! )?;
//! let engine = FdDividendEngine::new(market, FdSettings::default());
//! let results = option.price(&engine)?;
//! assert!(results.npv > 0.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Arrays, the normal distribution, splines and root finding.
pub use ql_math as math;

/// Finite-difference operators, boundary conditions and step conditions.
pub use ql_methods as methods;

/// Options, payoffs, exercise styles and dividend schedules.
pub use ql_instruments as instruments;

/// Analytic and finite-difference pricing engines.
pub use ql_pricingengines as pricingengines;
