//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European vanilla options using the closed-form Black-Scholes-Merton
//! formula. Computes NPV and first/second-order Greeks.

use ql_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use ql_instruments::{
    ExerciseType, OptionType, PricingEngine, PricingResults, VanillaOptionArguments,
};
use ql_math::distributions::{normal_cdf, normal_pdf};

use crate::market::BlackScholesMarket;

/// Price and Greeks of a European option.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlackScholesResults {
    /// Option value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂σ` per 1.0 absolute vol.
    pub vega: Real,
    /// `∂V/∂t` per year.
    pub theta: Real,
    /// `∂V/∂r` per 1.0 rate shift.
    pub rho: Real,
}

impl BlackScholesResults {
    /// Package as engine results.
    pub fn to_pricing_results(&self) -> PricingResults {
        PricingResults::from_npv(self.value)
            .with_result("delta", self.delta)
            .with_result("gamma", self.gamma)
            .with_result("vega", self.vega)
            .with_result("theta", self.theta)
            .with_result("rho", self.rho)
    }
}

/// Analytic pricing engine for European vanilla options.
///
/// Implements the Black-Scholes-Merton closed-form solution:
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$
#[derive(Debug, Clone)]
pub struct AnalyticEuropeanEngine {
    market: BlackScholesMarket,
}

impl AnalyticEuropeanEngine {
    /// Create a new engine on the given market.
    pub fn new(market: BlackScholesMarket) -> Self {
        Self { market }
    }
}

/// Compute Black-Scholes price and Greeks for a European option.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
) -> BlackScholesResults {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        return BlackScholesResults {
            value: (phi * (spot - strike)).max(0.0),
            ..BlackScholesResults::default()
        };
    }

    let r = risk_free_rate;
    let q = dividend_yield;
    let sigma = volatility;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let fwd = spot * ((r - q) * t).exp();

    let (d1, d2) = if std_dev > 1e-15 {
        let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
        let d2 = d1 - std_dev;
        (d1, d2)
    } else {
        let big = if fwd > strike { 1e15 } else { -1e15 };
        (big, big)
    };

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let value = phi * (spot * df_q * nd1 - strike * df_r * nd2);
    let delta = phi * df_q * nd1;
    let gamma = if std_dev > 1e-15 {
        df_q * npd1 / (spot * std_dev)
    } else {
        0.0
    };
    let vega = spot * df_q * npd1 * sqrt_t;
    let theta = {
        let term1 = -(spot * df_q * npd1 * sigma) / (2.0 * sqrt_t);
        let term2 = -phi * r * strike * df_r * nd2;
        let term3 = phi * q * spot * df_q * nd1;
        term1 + term2 + term3
    };
    let rho = phi * strike * t * df_r * nd2;

    BlackScholesResults {
        value,
        delta,
        gamma,
        vega,
        theta,
        rho,
    }
}

impl PricingEngine<VanillaOptionArguments> for AnalyticEuropeanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        ensure!(
            args.exercise.exercise_type() == ExerciseType::European,
            "not an European option: {}",
            args.exercise
        );
        let m = &self.market;
        let results = black_scholes_merton(
            args.payoff.option_type(),
            m.spot,
            args.payoff.strike(),
            m.risk_free_rate,
            m.dividend_yield,
            m.volatility,
            args.exercise.residual_time(),
        );
        Ok(results.to_pricing_results())
    }
}
