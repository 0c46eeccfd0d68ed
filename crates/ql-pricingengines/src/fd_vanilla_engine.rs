//! Finite-difference engine for vanilla options without dividends.
//!
//! A single Crank-Nicolson rollback from expiry to today on a grid centred on
//! the spot, control-variate corrected against Black-Scholes-Merton.

use ql_core::{ensure, errors::Result, Real};
use ql_instruments::{PricingEngine, PricingResults, StrikedPayoff, VanillaOptionArguments};
use ql_methods::{safe_grid_points, GridBounds};

use crate::analytic_european_engine::black_scholes_merton;
use crate::control_variate::{ControlVariate, CorrectedGreeks};
use crate::fd_setup::{
    bumped_sensitivities, exercise_condition, intrinsic_values, period_model, pricing_results,
    FdSettings,
};
use crate::market::BlackScholesMarket;

/// Finite-difference engine for vanilla options.
#[derive(Debug, Clone)]
pub struct FdVanillaEngine {
    market: BlackScholesMarket,
    settings: FdSettings,
}

impl FdVanillaEngine {
    /// Create a new engine.
    pub fn new(market: BlackScholesMarket, settings: FdSettings) -> Self {
        Self { market, settings }
    }

    fn solve(
        &self,
        market: &BlackScholesMarket,
        args: &VanillaOptionArguments,
    ) -> Result<CorrectedGreeks> {
        let payoff: &dyn StrikedPayoff = &*args.payoff;
        let residual_time = args.exercise.residual_time();
        ensure!(
            residual_time > 0.0,
            "residual time must be positive, got {residual_time}"
        );

        let grid_points = safe_grid_points(self.settings.grid_points, residual_time);
        let bounds = GridBounds::natural(
            market.spot,
            payoff.strike(),
            market.volatility,
            residual_time,
        )?;
        let grid = bounds.grid(grid_points)?;
        let intrinsic = intrinsic_values(payoff, &grid);
        let model = period_model(&grid, &intrinsic, market)?;
        let condition = exercise_condition(&args.exercise, &intrinsic, market);

        let steps = self.settings.time_steps;
        let prices = model.rollback(
            intrinsic.clone(),
            residual_time,
            0.0,
            steps,
            condition.as_deref(),
        )?;
        let control_prices = model.rollback(intrinsic, residual_time, 0.0, steps, None)?;

        let control = ControlVariate::new(black_scholes_merton(
            payoff.option_type(),
            market.spot,
            payoff.strike(),
            market.risk_free_rate,
            market.dividend_yield,
            market.volatility,
            residual_time,
        ));
        control.correct(&prices, &control_prices, &grid)
    }

    /// Control-corrected value only.
    pub fn value(&self, args: &VanillaOptionArguments) -> Result<Real> {
        Ok(self.solve(&self.market, args)?.value)
    }
}

impl PricingEngine<VanillaOptionArguments> for FdVanillaEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let greeks = self.solve(&self.market, args)?;
        let (vega, rho) = bumped_sensitivities(&self.market, greeks.value, |m| {
            Ok(self.solve(&m, args)?.value)
        })?;
        tracing::debug!(
            npv = greeks.value,
            exercise = %args.exercise,
            "fd vanilla engine"
        );
        Ok(pricing_results(&self.market, self.market.spot, greeks, vega, rho))
    }
}
