//! Finite-difference engine for options on assets paying discrete cash
//! dividends.
//!
//! * [`bounds`]: grid bounds ratchet across ex-dividend dates
//! * [`transfer`]: log-space spline transfer of values between grids
//! * [`orchestrator`]: the period loop and its state

use ql_core::errors::Result;
use ql_instruments::{DividendVanillaOptionArguments, PricingEngine, PricingResults};

use crate::fd_setup::FdSettings;
use crate::market::BlackScholesMarket;

pub mod bounds;
pub mod orchestrator;
pub mod transfer;

pub use bounds::ratchet_bounds;
pub use orchestrator::{FdDividendOption, FdState};
pub use transfer::transfer_prices;

/// Finite-difference pricing engine for dividend vanilla options.
///
/// European, American and shout exercise are supported; the exercise type of
/// the instrument selects the constraint.
#[derive(Debug, Clone)]
pub struct FdDividendEngine {
    market: BlackScholesMarket,
    settings: FdSettings,
}

impl FdDividendEngine {
    /// Create a new engine.
    pub fn new(market: BlackScholesMarket, settings: FdSettings) -> Self {
        Self { market, settings }
    }

    /// The finite-difference problem for `args`, validated.
    pub fn option(&self, args: &DividendVanillaOptionArguments) -> Result<FdDividendOption> {
        FdDividendOption::new(
            args.payoff.clone(),
            args.exercise,
            self.market,
            args.dividends.clone(),
            self.settings,
        )
    }
}

impl PricingEngine<DividendVanillaOptionArguments> for FdDividendEngine {
    fn calculate(&self, args: &DividendVanillaOptionArguments) -> Result<PricingResults> {
        self.option(args)?.calculate()
    }
}
