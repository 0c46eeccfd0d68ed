//! `Instrument` and `PricingEngine` contracts.
//!
//! Instruments hold their contractual terms; engines hold market data and numerical
//! settings and turn an instrument's arguments into `PricingResults`.

use ql_core::{errors::Result, Real, Time};
use std::collections::HashMap;

/// Results of pricing an instrument.
///
/// Contains the NPV and additional named results such as "delta",
/// "gamma", "theta", "vega" and "rho".
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// Base trait for all pricing engines.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<PricingResults>;
}

/// Base trait for all financial instruments.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// Years until the last relevant event.
    fn residual_time(&self) -> Time;

    /// Whether the instrument is expired.
    fn is_expired(&self) -> bool {
        self.residual_time() <= 0.0
    }
}
