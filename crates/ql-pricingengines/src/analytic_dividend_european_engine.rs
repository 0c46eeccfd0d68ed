//! Analytic engine for European options on an asset paying discrete cash
//! dividends.
//!
//! The Black-Scholes-Merton formula is applied to the spot net of the
//! present value of the dividends, `S − Σ Dᵢ e^{−r tᵢ}`.  Since that present
//! value depends on the rate and moves with the valuation date, rho and
//! theta pick up a delta-weighted dividend term.

use ql_core::{ensure, errors::Result, Real};
use ql_instruments::{
    DividendSchedule, DividendVanillaOptionArguments, ExerciseType, OptionType, PricingEngine,
    PricingResults,
};

use crate::analytic_european_engine::{black_scholes_merton, BlackScholesResults};
use crate::market::BlackScholesMarket;

/// Price and Greeks of a European option with discrete dividends.
///
/// # Errors
/// Fails if a dividend goes ex after expiry or the dividends' present value
/// is not below the spot.
pub fn dividend_european(
    option_type: OptionType,
    strike: Real,
    market: &BlackScholesMarket,
    dividends: &DividendSchedule,
    residual_time: Real,
) -> Result<BlackScholesResults> {
    dividends.check_residual_time(residual_time)?;
    let r = market.risk_free_rate;
    let pv = dividends.present_value(r);
    let adjusted_spot = market.spot - pv;
    ensure!(
        adjusted_spot > 0.0,
        "dividends present value ({pv}) cannot exceed underlying ({})",
        market.spot
    );

    let mut results = black_scholes_merton(
        option_type,
        adjusted_spot,
        strike,
        r,
        market.dividend_yield,
        market.volatility,
        residual_time,
    );
    results.rho += results.delta * dividends.present_value_duration(r);
    results.theta -= results.delta * r * pv;
    Ok(results)
}

/// Analytic pricing engine for European options with cash dividends.
#[derive(Debug, Clone)]
pub struct AnalyticDividendEuropeanEngine {
    market: BlackScholesMarket,
}

impl AnalyticDividendEuropeanEngine {
    /// Create a new engine on the given market.
    pub fn new(market: BlackScholesMarket) -> Self {
        Self { market }
    }
}

impl PricingEngine<DividendVanillaOptionArguments> for AnalyticDividendEuropeanEngine {
    fn calculate(&self, args: &DividendVanillaOptionArguments) -> Result<PricingResults> {
        ensure!(
            args.exercise.exercise_type() == ExerciseType::European,
            "not an European option: {}",
            args.exercise
        );
        let results = dividend_european(
            args.payoff.option_type(),
            args.payoff.strike(),
            &self.market,
            &args.dividends,
            args.exercise.residual_time(),
        )?;
        Ok(results.to_pricing_results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn market() -> BlackScholesMarket {
        BlackScholesMarket::new(100.0, 0.06, 0.0, 0.25).unwrap()
    }

    #[test]
    fn no_dividends_reduces_to_black_scholes() {
        let plain = black_scholes_merton(OptionType::Call, 100.0, 100.0, 0.06, 0.0, 0.25, 1.0);
        let div = dividend_european(OptionType::Call, 100.0, &market(), &DividendSchedule::empty(), 1.0)
            .unwrap();
        assert_eq!(plain, div);
    }

    #[test]
    fn dividends_lower_calls_and_raise_puts() {
        let schedule = DividendSchedule::new(vec![3.0], vec![0.5]).unwrap();
        let call0 = dividend_european(OptionType::Call, 100.0, &market(), &DividendSchedule::empty(), 1.0).unwrap();
        let call = dividend_european(OptionType::Call, 100.0, &market(), &schedule, 1.0).unwrap();
        let put0 = dividend_european(OptionType::Put, 100.0, &market(), &DividendSchedule::empty(), 1.0).unwrap();
        let put = dividend_european(OptionType::Put, 100.0, &market(), &schedule, 1.0).unwrap();
        assert!(call.value < call0.value);
        assert!(put.value > put0.value);
    }

    #[test]
    fn rho_includes_dividend_term() {
        let schedule = DividendSchedule::new(vec![2.0, 2.0], vec![0.25, 0.75]).unwrap();
        let price = |r: Real| {
            let m = market().with_risk_free_rate(r).unwrap();
            dividend_european(OptionType::Call, 100.0, &m, &schedule, 1.0).unwrap().value
        };
        let g = dividend_european(OptionType::Call, 100.0, &market(), &schedule, 1.0).unwrap();
        let h = 1e-5;
        assert_abs_diff_eq!(g.rho, (price(0.06 + h) - price(0.06 - h)) / (2.0 * h), epsilon = 1e-4);
    }

    #[test]
    fn rejects_late_dividends_and_american_exercise() {
        let schedule = DividendSchedule::new(vec![1.0], vec![1.5]).unwrap();
        assert!(dividend_european(OptionType::Call, 100.0, &market(), &schedule, 1.0).is_err());

        use ql_instruments::{DividendVanillaOption, Exercise, PlainVanillaPayoff};
        use std::sync::Arc;
        let option = DividendVanillaOption::new(
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0)),
            Exercise::american(1.0),
            DividendSchedule::empty(),
        )
        .unwrap();
        assert!(option.price(&AnalyticDividendEuropeanEngine::new(market())).is_err());
    }
}
