//! Flat Black-Scholes market data.

use ql_core::{ensure, errors::Result, Rate, Real, Volatility};

/// Spot, continuously compounded rates and volatility, all flat.
///
/// Stands in for a `GeneralizedBlackScholesProcess` with flat term
/// structures; the finite-difference operators need constant coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlackScholesMarket {
    /// Quoted price of the underlying.
    pub spot: Real,
    /// Risk-free rate.
    pub risk_free_rate: Rate,
    /// Continuous dividend yield.
    pub dividend_yield: Rate,
    /// Black volatility.
    pub volatility: Volatility,
}

impl BlackScholesMarket {
    /// Validate and build market data.
    ///
    /// # Errors
    /// Fails unless the spot and volatility are positive and every input is
    /// finite.
    pub fn new(
        spot: Real,
        risk_free_rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        ensure!(
            spot.is_finite() && spot > 0.0,
            "spot must be positive, got {spot}"
        );
        ensure!(
            risk_free_rate.is_finite() && dividend_yield.is_finite(),
            "rates must be finite, got r = {risk_free_rate}, q = {dividend_yield}"
        );
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive, got {volatility}"
        );
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }

    /// The same market with another volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Result<Self> {
        Self::new(self.spot, self.risk_free_rate, self.dividend_yield, volatility)
    }

    /// The same market with another risk-free rate.
    pub fn with_risk_free_rate(&self, risk_free_rate: Rate) -> Result<Self> {
        Self::new(self.spot, risk_free_rate, self.dividend_yield, self.volatility)
    }

    /// The same market with another spot.
    pub fn with_spot(&self, spot: Real) -> Result<Self> {
        Self::new(spot, self.risk_free_rate, self.dividend_yield, self.volatility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(BlackScholesMarket::new(100.0, 0.05, 0.0, 0.2).is_ok());
        assert!(BlackScholesMarket::new(0.0, 0.05, 0.0, 0.2).is_err());
        assert!(BlackScholesMarket::new(100.0, 0.05, 0.0, 0.0).is_err());
        assert!(BlackScholesMarket::new(100.0, Real::NAN, 0.0, 0.2).is_err());
    }

    #[test]
    fn bumps_keep_the_other_fields() {
        let m = BlackScholesMarket::new(100.0, 0.05, 0.01, 0.2).unwrap();
        let v = m.with_volatility(0.3).unwrap();
        assert_eq!(v.volatility, 0.3);
        assert_eq!(v.spot, 100.0);
        let r = m.with_risk_free_rate(0.06).unwrap();
        assert_eq!(r.risk_free_rate, 0.06);
        assert_eq!(r.dividend_yield, 0.01);
        assert!(m.with_spot(-1.0).is_err());
    }
}
