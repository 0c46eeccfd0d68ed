//! Period-by-period rollback of an option across ex-dividend dates.
//!
//! The solver works in escrowed terms: at expiry the grid is centred on
//! `spot − Σ Dᵢ`.  Moving back in time the value function is rolled back to
//! the latest remaining ex-dividend date, then re-gridded one dividend
//! higher, until the valuation date is reached with the grid centred on the
//! quoted spot.  A control solution (the European option) rides along on the
//! same grids and anchors the result to the analytic dividend-European
//! price.

use ql_core::{ensure, errors::Result, Real, Size, Time};
use ql_instruments::{DividendSchedule, EscrowedSpot, Exercise, PricingResults, StrikedPayoff};
use ql_math::{brent, Array};
use ql_methods::{safe_grid_points, GridBounds};
use std::sync::Arc;

use super::bounds::ratchet_bounds;
use super::transfer::transfer_prices;
use crate::analytic_dividend_european_engine::dividend_european;
use crate::control_variate::{ControlVariate, CorrectedGreeks};
use crate::fd_setup::{
    bumped_sensitivities, exercise_condition, intrinsic_values, period_model, pricing_results,
    FdSettings, TIME_TOLERANCE,
};
use crate::market::BlackScholesMarket;

/// Evaluation budget of the implied volatility search.
const MAX_EVALUATIONS: Size = 100;

/// Solver state between two rollbacks.
///
/// Every transition consumes the state and returns a fresh one, so the
/// primary and control arrays are never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct FdState {
    /// Bounds and centre of the current grid.
    pub bounds: GridBounds,
    /// Asset-price nodes.
    pub grid: Array,
    /// Payoff sampled on the grid.
    pub intrinsic: Array,
    /// Primary solution, constrained by the exercise right.
    pub prices: Array,
    /// Control solution, never constrained.
    pub control_prices: Array,
}

/// An option on an asset paying discrete cash dividends, ready to be valued
/// by finite differences.
#[derive(Debug, Clone)]
pub struct FdDividendOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
    market: BlackScholesMarket,
    dividends: DividendSchedule,
    escrowed: EscrowedSpot,
    settings: FdSettings,
    grid_points: Size,
    control: ControlVariate,
}

impl FdDividendOption {
    /// Validate inputs and set up the control variate.
    ///
    /// # Errors
    /// - a dividend schedule error if a dividend goes ex after expiry or the
    ///   dividends add up to the spot or more;
    /// - a precondition error if the residual time is not positive.
    pub fn new(
        payoff: Arc<dyn StrikedPayoff>,
        exercise: Exercise,
        market: BlackScholesMarket,
        dividends: DividendSchedule,
        settings: FdSettings,
    ) -> Result<Self> {
        let residual_time = exercise.residual_time();
        ensure!(
            residual_time > 0.0,
            "residual time must be positive, got {residual_time}"
        );
        dividends.check_residual_time(residual_time)?;
        let escrowed = dividends.escrow(market.spot)?;
        let analytic_market = market.with_spot(escrowed.reverse_escrowed())?;
        let analytic = dividend_european(
            payoff.option_type(),
            payoff.strike(),
            &analytic_market,
            &dividends,
            residual_time,
        )?;
        let grid_points = safe_grid_points(settings.grid_points, residual_time);
        tracing::debug!(
            escrowed_spot = escrowed.escrowed(),
            dividends = dividends.len(),
            grid_points,
            time_steps = settings.time_steps,
            analytic = analytic.value,
            "fd dividend option"
        );
        Ok(Self {
            payoff,
            exercise,
            market,
            dividends,
            escrowed,
            settings,
            grid_points,
            control: ControlVariate::new(analytic),
        })
    }

    /// The same option on another market.
    pub fn with_market(&self, market: BlackScholesMarket) -> Result<Self> {
        Self::new(
            Arc::clone(&self.payoff),
            self.exercise,
            market,
            self.dividends.clone(),
            self.settings,
        )
    }

    /// The escrowed spot the solver starts from.
    pub fn escrowed_spot(&self) -> &EscrowedSpot {
        &self.escrowed
    }

    /// Number of grid points actually used.
    pub fn grid_points(&self) -> Size {
        self.grid_points
    }

    /// The analytic anchor of the control variate.
    pub fn control_variate(&self) -> &ControlVariate {
        &self.control
    }

    /// The payoff at expiry on a grid centred on the escrowed spot.
    pub fn initial_state(&self) -> Result<FdState> {
        let bounds = GridBounds::natural(
            self.escrowed.escrowed(),
            self.payoff.strike(),
            self.market.volatility,
            self.exercise.residual_time(),
        )?;
        let grid = bounds.grid(self.grid_points)?;
        let intrinsic = intrinsic_values(&*self.payoff, &grid);
        Ok(FdState {
            bounds,
            prices: intrinsic.clone(),
            control_prices: intrinsic.clone(),
            intrinsic,
            grid,
        })
    }

    /// Roll both solutions back from `from` to `to` on the current grid.
    ///
    /// The exercise constraint is applied to the primary solution after each
    /// time step.  Intervals of zero length leave the state unchanged.
    pub fn rollback(&self, state: FdState, from: Time, to: Time) -> Result<FdState> {
        if from - to <= TIME_TOLERANCE {
            return Ok(state);
        }
        let model = period_model(&state.grid, &state.intrinsic, &self.market)?;
        let condition = exercise_condition(&self.exercise, &state.intrinsic, &self.market);
        let steps = self.settings.time_steps;
        let prices = model.rollback(state.prices, from, to, steps, condition.as_deref())?;
        let control_prices = model.rollback(state.control_prices, from, to, steps, None)?;
        Ok(FdState {
            prices,
            control_prices,
            ..state
        })
    }

    /// Cross the ex-dividend date of dividend `step`, moving back in time.
    ///
    /// The grid is re-centred one dividend higher with ratcheted bounds, both
    /// solutions are transferred onto it from the old grid shifted by the
    /// dividend, and the exercise constraint is applied to the primary
    /// solution at the ex-dividend time.
    pub fn execute_intermediate_step(&self, state: FdState, step: Size) -> Result<FdState> {
        ensure!(
            step < self.dividends.len(),
            "dividend index {step} out of range (0..{})",
            self.dividends.len()
        );
        let dividend = self.dividends.amounts()[step];
        let date = self.dividends.ex_dividend_times()[step];

        let bounds = ratchet_bounds(
            &state.bounds,
            dividend,
            self.payoff.strike(),
            self.market.volatility,
            date,
        )?;
        let old_grid = &state.grid + dividend;
        let grid = bounds.grid(self.grid_points)?;
        let intrinsic = intrinsic_values(&*self.payoff, &grid);

        let mut prices = transfer_prices(&state.prices, &old_grid, &grid)?;
        let control_prices = transfer_prices(&state.control_prices, &old_grid, &grid)?;
        if let Some(condition) = exercise_condition(&self.exercise, &intrinsic, &self.market) {
            condition.apply_to(&mut prices, date)?;
        }

        tracing::debug!(
            step,
            date,
            dividend,
            s_min = bounds.s_min(),
            s_max = bounds.s_max(),
            center = bounds.center(),
            "ex-dividend transition"
        );
        Ok(FdState {
            bounds,
            grid,
            intrinsic,
            prices,
            control_prices,
        })
    }

    /// Run every period from expiry back to the valuation date.
    pub fn solve(&self) -> Result<FdState> {
        let mut state = self.initial_state()?;
        let mut from = self.exercise.residual_time();
        for (step, date) in self.dividends.ex_dividend_times().iter().enumerate().rev() {
            state = self.rollback(state, from, *date)?;
            state = self.execute_intermediate_step(state, step)?;
            from = *date;
        }
        self.rollback(state, from, 0.0)
    }

    /// Control-corrected value, delta and gamma.
    pub fn greeks(&self) -> Result<CorrectedGreeks> {
        let state = self.solve()?;
        self.control
            .correct(&state.prices, &state.control_prices, &state.grid)
    }

    /// Control-corrected value.
    pub fn value(&self) -> Result<Real> {
        Ok(self.greeks()?.value)
    }

    /// Value and Greeks.  Vega and rho are found by bumping and repricing.
    pub fn calculate(&self) -> Result<PricingResults> {
        let greeks = self.greeks()?;
        let (vega, rho) = bumped_sensitivities(&self.market, greeks.value, |m| {
            self.with_market(m)?.value()
        })?;
        Ok(pricing_results(
            &self.market,
            self.escrowed.escrowed(),
            greeks,
            vega,
            rho,
        ))
    }

    /// Volatility at which the option is worth `target_value`.
    ///
    /// # Errors
    /// Fails if the target is not bracketed by `[min_vol, max_vol]` or the
    /// search does not converge.
    pub fn implied_volatility(
        &self,
        target_value: Real,
        accuracy: Real,
        min_vol: Real,
        max_vol: Real,
    ) -> Result<Real> {
        ensure!(
            min_vol > 0.0 && max_vol > min_vol,
            "invalid volatility range [{min_vol}, {max_vol}]"
        );
        let vol = brent(
            |v| Ok(self.with_market(self.market.with_volatility(v)?)?.value()? - target_value),
            min_vol,
            max_vol,
            accuracy,
            MAX_EVALUATIONS,
        )?;
        tracing::debug!(target_value, vol, "implied volatility");
        Ok(vol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_instruments::{OptionType, PlainVanillaPayoff};

    fn option(exercise: Exercise, amounts: Vec<Real>, times: Vec<Time>) -> FdDividendOption {
        let market = BlackScholesMarket::new(100.0, 0.05, 0.0, 0.25).unwrap();
        FdDividendOption::new(
            Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0)),
            exercise,
            market,
            DividendSchedule::new(amounts, times).unwrap(),
            FdSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn initial_state_is_centred_on_the_escrowed_spot() {
        let opt = option(Exercise::american(1.0), vec![3.0, 2.0], vec![0.3, 0.6]);
        let state = opt.initial_state().unwrap();
        assert_eq!(opt.escrowed_spot().escrowed(), 95.0);
        assert_eq!(state.bounds.center(), 95.0);
        assert_abs_diff_eq!(state.grid[opt.grid_points() / 2], 95.0, epsilon = 1e-10);
        assert_eq!(state.prices, state.intrinsic);
        assert_eq!(state.control_prices, state.intrinsic);
    }

    #[test]
    fn transitions_end_centred_on_the_quoted_spot() {
        let opt = option(Exercise::american(1.0), vec![3.0, 2.0], vec![0.3, 0.6]);
        let state = opt.solve().unwrap();
        assert_abs_diff_eq!(state.bounds.center(), 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.grid[opt.grid_points() / 2], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn european_value_is_the_analytic_anchor() {
        let opt = option(Exercise::european(1.0), vec![4.0], vec![0.5]);
        assert_abs_diff_eq!(
            opt.value().unwrap(),
            opt.control_variate().analytic().value,
            epsilon = 1e-10
        );
    }

    #[test]
    fn step_index_out_of_range() {
        let opt = option(Exercise::american(1.0), vec![1.0], vec![0.5]);
        let state = opt.initial_state().unwrap();
        assert!(opt.execute_intermediate_step(state, 1).is_err());
    }

    #[test]
    fn dividends_on_the_boundary_dates() {
        let at_expiry = option(Exercise::american(1.0), vec![2.0], vec![1.0]);
        let at_start = option(Exercise::american(1.0), vec![2.0], vec![0.0]);
        let v_expiry = at_expiry.value().unwrap();
        let v_start = at_start.value().unwrap();
        assert!(v_expiry.is_finite() && v_expiry > 0.0);
        assert!(v_start.is_finite() && v_start > 0.0);
    }

    #[test]
    fn implied_volatility_recovers_the_input() {
        let opt = option(Exercise::american(1.0), vec![2.0], vec![0.5]);
        let target = opt.value().unwrap();
        let vol = opt.implied_volatility(target, 1e-6, 0.05, 1.0).unwrap();
        assert_abs_diff_eq!(vol, 0.25, epsilon = 1e-4);
    }

    #[test]
    fn construction_failures() {
        let market = BlackScholesMarket::new(100.0, 0.05, 0.0, 0.25).unwrap();
        let payoff: Arc<dyn StrikedPayoff> =
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
        let too_large = DividendSchedule::new(vec![60.0, 40.0], vec![0.2, 0.4]).unwrap();
        assert!(FdDividendOption::new(
            Arc::clone(&payoff),
            Exercise::american(1.0),
            market,
            too_large,
            FdSettings::default()
        )
        .is_err());
        let late = DividendSchedule::new(vec![1.0], vec![2.0]).unwrap();
        assert!(FdDividendOption::new(
            payoff,
            Exercise::american(1.0),
            market,
            late,
            FdSettings::default()
        )
        .is_err());
    }
}
