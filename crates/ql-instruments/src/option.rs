//! Vanilla option instruments, with and without discrete dividends.

use crate::dividend_schedule::DividendSchedule;
use crate::exercise::Exercise;
use crate::instrument::{Instrument, PricingEngine, PricingResults};
use crate::payoff::{OptionType, PlainVanillaPayoff, StrikedPayoff};
use ql_core::{ensure, errors::Result, Real, Time};
use std::sync::Arc;

// ────────────────────────────────────────────────────────────────────────────
// Option arguments (sent to pricing engines)
// ────────────────────────────────────────────────────────────────────────────

/// Arguments needed for pricing a one-asset option.
#[derive(Debug, Clone)]
pub struct VanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// The exercise specification.
    pub exercise: Exercise,
}

/// Arguments needed for pricing an option on a dividend-paying asset.
#[derive(Debug, Clone)]
pub struct DividendVanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// The exercise specification.
    pub exercise: Exercise,
    /// Cash dividends going ex before expiry.
    pub dividends: DividendSchedule,
}

// ────────────────────────────────────────────────────────────────────────────
// VanillaOption
// ────────────────────────────────────────────────────────────────────────────

/// A plain vanilla option on a single underlying asset.
#[derive(Debug)]
pub struct VanillaOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
}

impl VanillaOption {
    /// Create a new vanilla option.
    pub fn new(payoff: Arc<dyn StrikedPayoff>, exercise: Exercise) -> Self {
        Self { payoff, exercise }
    }

    /// Convenience: create a European call/put expiring in `residual_time`
    /// years.
    pub fn european(option_type: OptionType, strike: Real, residual_time: Time) -> Self {
        Self {
            payoff: Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            exercise: Exercise::european(residual_time),
        }
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.payoff.strike()
    }

    /// The option type (call/put).
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Get the arguments for a pricing engine.
    pub fn arguments(&self) -> VanillaOptionArguments {
        VanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise,
        }
    }

    /// Price this option using the given engine.
    pub fn price(
        &self,
        engine: &dyn PricingEngine<VanillaOptionArguments>,
    ) -> Result<PricingResults> {
        engine.calculate(&self.arguments())
    }
}

impl Instrument for VanillaOption {
    fn residual_time(&self) -> Time {
        self.exercise.residual_time()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DividendVanillaOption
// ────────────────────────────────────────────────────────────────────────────

/// A vanilla option on an asset paying a known schedule of cash dividends.
#[derive(Debug)]
pub struct DividendVanillaOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
    dividends: DividendSchedule,
}

impl DividendVanillaOption {
    /// Create a new dividend-paying vanilla option.
    ///
    /// # Errors
    /// Fails if the residual time is not positive or if a dividend goes ex
    /// after expiry.  Whether the dividends fit under the spot depends on
    /// market data and is checked by the engines.
    pub fn new(
        payoff: Arc<dyn StrikedPayoff>,
        exercise: Exercise,
        dividends: DividendSchedule,
    ) -> Result<Self> {
        let residual_time = exercise.residual_time();
        ensure!(
            residual_time > 0.0,
            "residual time must be positive, got {residual_time}"
        );
        dividends.check_residual_time(residual_time)?;
        Ok(Self {
            payoff,
            exercise,
            dividends,
        })
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.payoff.strike()
    }

    /// The option type (call/put).
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// The dividend schedule.
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// Get the arguments for a pricing engine.
    pub fn arguments(&self) -> DividendVanillaOptionArguments {
        DividendVanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise,
            dividends: self.dividends.clone(),
        }
    }

    /// Price this option using the given engine.
    pub fn price(
        &self,
        engine: &dyn PricingEngine<DividendVanillaOptionArguments>,
    ) -> Result<PricingResults> {
        engine.calculate(&self.arguments())
    }
}

impl Instrument for DividendVanillaOption {
    fn residual_time(&self) -> Time {
        self.exercise.residual_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseType;
    use ql_core::errors::{DividendScheduleError, Error};

    #[derive(Debug)]
    struct StrikeEngine;

    impl PricingEngine<DividendVanillaOptionArguments> for StrikeEngine {
        fn calculate(&self, args: &DividendVanillaOptionArguments) -> Result<PricingResults> {
            Ok(PricingResults::from_npv(args.payoff.strike())
                .with_result("dividends", args.dividends.len() as Real))
        }
    }

    fn put(residual_time: Time, dividends: DividendSchedule) -> Result<DividendVanillaOption> {
        DividendVanillaOption::new(
            Arc::new(PlainVanillaPayoff::new(OptionType::Put, 95.0)),
            Exercise::american(residual_time),
            dividends,
        )
    }

    #[test]
    fn european_call_construction() {
        let opt = VanillaOption::european(OptionType::Call, 100.0, 0.75);
        assert_eq!(opt.strike(), 100.0);
        assert_eq!(opt.option_type(), OptionType::Call);
        assert_eq!(opt.exercise().exercise_type(), ExerciseType::European);
        assert_eq!(opt.residual_time(), 0.75);
        assert!(!opt.is_expired());

        let args = opt.arguments();
        assert_eq!(args.payoff.strike(), 100.0);
        assert_eq!(args.exercise, Exercise::european(0.75));
    }

    #[test]
    fn dividend_option_carries_its_schedule() {
        let dividends = DividendSchedule::new(vec![1.0, 1.5], vec![0.25, 0.75]).unwrap();
        let opt = put(1.0, dividends.clone()).unwrap();
        assert_eq!(opt.strike(), 95.0);
        assert_eq!(opt.option_type(), OptionType::Put);
        assert_eq!(opt.dividends(), &dividends);
        assert_eq!(opt.residual_time(), 1.0);

        let results = opt.price(&StrikeEngine).unwrap();
        assert_eq!(results.npv, 95.0);
        assert_eq!(results.result("dividends"), Some(2.0));
    }

    #[test]
    fn dividend_on_the_expiry_date_is_accepted() {
        let dividends = DividendSchedule::new(vec![2.0], vec![1.0]).unwrap();
        assert!(put(1.0, dividends).is_ok());
    }

    #[test]
    fn late_dividend_is_rejected_at_construction() {
        let dividends = DividendSchedule::new(vec![2.0], vec![1.25]).unwrap();
        let err = put(1.0, dividends).unwrap_err();
        assert!(matches!(
            err,
            Error::DividendSchedule(DividendScheduleError::ExDividendAfterExpiry { index: 0, .. })
        ));
    }

    #[test]
    fn expired_option_is_rejected() {
        assert!(matches!(
            put(0.0, DividendSchedule::empty()).unwrap_err(),
            Error::Precondition(_)
        ));
    }
}
