//! Period set-up shared by the finite-difference engines.
//!
//! Every period samples the payoff on its grid, builds the BSM operator with
//! Neumann boundaries set to the payoff slope, and picks the step condition
//! from the exercise style.

use ql_core::{ensure, errors::Result, Real, Size, Time};
use ql_instruments::{Exercise, ExerciseType, PricingResults, StrikedPayoff};
use ql_math::Array;
use ql_methods::{
    bsm_operator, AmericanCondition, FiniteDifferenceModel, NeumannBoundary, ShoutCondition,
    StepCondition,
};

use crate::control_variate::CorrectedGreeks;
use crate::market::BlackScholesMarket;

/// Relative volatility bump used for vega.
pub(crate) const VOLATILITY_BUMP: Real = 1.0e-4;
/// Absolute rate bump used for rho.
pub(crate) const RATE_BUMP: Real = 1.0e-4;
/// Intervals shorter than this are not rolled back over.
pub(crate) const TIME_TOLERANCE: Time = 1.0e-10;

/// Numerical settings of a finite-difference engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdSettings {
    /// Time steps per rollback period.
    pub time_steps: Size,
    /// Requested number of grid points; see
    /// [`ql_methods::safe_grid_points`] for the number actually used.
    pub grid_points: Size,
}

impl FdSettings {
    /// Validate and build settings.
    pub fn new(time_steps: Size, grid_points: Size) -> Result<Self> {
        ensure!(time_steps > 0, "time steps must be positive");
        ensure!(grid_points >= 3, "at least 3 grid points required, got {grid_points}");
        Ok(Self {
            time_steps,
            grid_points,
        })
    }
}

impl Default for FdSettings {
    fn default() -> Self {
        Self {
            time_steps: 100,
            grid_points: 100,
        }
    }
}

/// The payoff sampled on `grid`.
pub(crate) fn intrinsic_values(payoff: &dyn StrikedPayoff, grid: &Array) -> Array {
    grid.map(|s| payoff.value(s))
}

/// Crank-Nicolson model on `grid` with edge slopes taken from `intrinsic`.
pub(crate) fn period_model(
    grid: &Array,
    intrinsic: &Array,
    market: &BlackScholesMarket,
) -> Result<FiniteDifferenceModel> {
    let operator = bsm_operator(
        grid,
        market.risk_free_rate,
        market.dividend_yield,
        market.volatility,
    )?;
    let boundaries = NeumannBoundary::from_edges(intrinsic)?;
    Ok(FiniteDifferenceModel::new(operator, boundaries.to_vec()))
}

/// The constraint enforced on the primary solution, if any.
pub(crate) fn exercise_condition(
    exercise: &Exercise,
    intrinsic: &Array,
    market: &BlackScholesMarket,
) -> Option<Box<dyn StepCondition>> {
    match exercise.exercise_type() {
        ExerciseType::European => None,
        ExerciseType::American => Some(Box::new(AmericanCondition::new(intrinsic.clone()))),
        ExerciseType::Shout => Some(Box::new(ShoutCondition::new(
            intrinsic.clone(),
            exercise.residual_time(),
            market.risk_free_rate,
        ))),
    }
}

/// Assemble engine results.  Theta follows from the Black-Scholes PDE at
/// `spot`: `θ = rV − (r−q)SΔ − ½σ²S²Γ`.
pub(crate) fn pricing_results(
    market: &BlackScholesMarket,
    spot: Real,
    greeks: CorrectedGreeks,
    vega: Real,
    rho: Real,
) -> PricingResults {
    let r = market.risk_free_rate;
    let q = market.dividend_yield;
    let sigma = market.volatility;
    let theta = r * greeks.value
        - (r - q) * spot * greeks.delta
        - 0.5 * sigma * sigma * spot * spot * greeks.gamma;
    PricingResults::from_npv(greeks.value)
        .with_result("delta", greeks.delta)
        .with_result("gamma", greeks.gamma)
        .with_result("theta", theta)
        .with_result("vega", vega)
        .with_result("rho", rho)
}

/// Vega and rho by bump and reprice.
pub(crate) fn bumped_sensitivities<F>(
    market: &BlackScholesMarket,
    value: Real,
    mut reprice: F,
) -> Result<(Real, Real)>
where
    F: FnMut(BlackScholesMarket) -> Result<Real>,
{
    let d_vol = market.volatility * VOLATILITY_BUMP;
    let vega = (reprice(market.with_volatility(market.volatility + d_vol)?)? - value) / d_vol;
    let rho = (reprice(market.with_risk_free_rate(market.risk_free_rate + RATE_BUMP)?)? - value)
        / RATE_BUMP;
    Ok((vega, rho))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_instruments::{OptionType, PlainVanillaPayoff};
    use ql_methods::log_grid;

    #[test]
    fn default_settings() {
        let s = FdSettings::default();
        assert_eq!(s.time_steps, 100);
        assert_eq!(s.grid_points, 100);
        assert!(FdSettings::new(0, 100).is_err());
        assert!(FdSettings::new(10, 2).is_err());
    }

    #[test]
    fn condition_follows_exercise_style() {
        let market = BlackScholesMarket::new(100.0, 0.05, 0.0, 0.2).unwrap();
        let intrinsic = Array::from_slice(&[0.0, 1.0, 2.0]);
        assert!(exercise_condition(&Exercise::european(1.0), &intrinsic, &market).is_none());

        let mut values = Array::zeros(3);
        let american = exercise_condition(&Exercise::american(1.0), &intrinsic, &market).unwrap();
        american.apply_to(&mut values, 0.5).unwrap();
        assert_eq!(values.as_slice(), intrinsic.as_slice());

        let mut values = Array::zeros(3);
        let shout = exercise_condition(&Exercise::shout(1.0), &intrinsic, &market).unwrap();
        shout.apply_to(&mut values, 0.5).unwrap();
        assert_abs_diff_eq!(values[2], 2.0 * (-0.025_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn model_boundaries_follow_payoff_slopes() {
        let market = BlackScholesMarket::new(100.0, 0.05, 0.0, 0.2).unwrap();
        let grid = log_grid(50.0, 200.0, 41).unwrap();
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        let intrinsic = intrinsic_values(&payoff, &grid);
        let model = period_model(&grid, &intrinsic, &market).unwrap();
        let values = model.rollback(intrinsic.clone(), 1.0, 0.0, 10, None).unwrap();
        assert_abs_diff_eq!(values[1] - values[0], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(values[40] - values[39], grid[40] - grid[39], epsilon = 1e-10);
    }

    #[test]
    fn theta_from_the_pde() {
        let market = BlackScholesMarket::new(100.0, 0.05, 0.01, 0.2).unwrap();
        let greeks = CorrectedGreeks {
            value: 10.0,
            delta: 0.5,
            gamma: 0.02,
        };
        let r = pricing_results(&market, 100.0, greeks, 1.0, 2.0);
        let expected = 0.05 * 10.0 - 0.04 * 100.0 * 0.5 - 0.5 * 0.04 * 1.0e4 * 0.02;
        assert_abs_diff_eq!(r.result("theta").unwrap(), expected, epsilon = 1e-12);
        assert_eq!(r.result("vega"), Some(1.0));
        assert_eq!(r.result("rho"), Some(2.0));
    }
}
