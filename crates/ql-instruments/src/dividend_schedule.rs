//! Discrete cash dividend schedule.
//!
//! A schedule pairs cash amounts one to one with ex-dividend times (year
//! fractions from the valuation date).  Validation is eager: a
//! [`DividendSchedule`] that exists is well formed, and an [`EscrowedSpot`]
//! that exists has a strictly positive escrowed value.
//!
//! Under the escrowed-dividend model the finite-difference solver works with
//! `spot − Σ Dᵢ` (undiscounted) as its underlying; adding the dividends back
//! recovers the quoted spot that the analytic reference pricer is fed.

use ql_core::{errors::DividendScheduleError, Real, Time};

/// A validated, time-ordered sequence of `(amount, ex-dividend time)` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawDividendSchedule", into = "RawDividendSchedule")
)]
pub struct DividendSchedule {
    amounts: Vec<Real>,
    ex_dividend_times: Vec<Time>,
}

impl DividendSchedule {
    /// Validate and build a schedule.
    ///
    /// # Errors
    /// - [`DividendScheduleError::CountMismatch`] if the two vectors differ
    ///   in length;
    /// - [`DividendScheduleError::NegativeDividend`] for a negative or
    ///   non-finite amount;
    /// - [`DividendScheduleError::NegativeExDividendTime`] for a time before
    ///   the valuation date;
    /// - [`DividendScheduleError::UnorderedExDividendTimes`] unless times are
    ///   strictly increasing.
    pub fn new(
        amounts: Vec<Real>,
        ex_dividend_times: Vec<Time>,
    ) -> Result<Self, DividendScheduleError> {
        if amounts.len() != ex_dividend_times.len() {
            return Err(DividendScheduleError::CountMismatch {
                dividends: amounts.len(),
                dates: ex_dividend_times.len(),
            });
        }
        if let Some((index, &amount)) = amounts
            .iter()
            .enumerate()
            .find(|(_, a)| !a.is_finite() || **a < 0.0)
        {
            return Err(DividendScheduleError::NegativeDividend { index, amount });
        }
        for (index, &time) in ex_dividend_times.iter().enumerate() {
            if !(time >= 0.0) {
                return Err(DividendScheduleError::NegativeExDividendTime { index, time });
            }
            if index > 0 {
                let previous = ex_dividend_times[index - 1];
                if time <= previous {
                    return Err(DividendScheduleError::UnorderedExDividendTimes {
                        index,
                        time,
                        previous,
                    });
                }
            }
        }
        Ok(Self {
            amounts,
            ex_dividend_times,
        })
    }

    /// A schedule with no dividends.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of dividends, i.e. number of period boundaries.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// `true` if there are no dividends.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Cash amounts in ex-date order.
    pub fn amounts(&self) -> &[Real] {
        &self.amounts
    }

    /// Ex-dividend times, strictly increasing.
    pub fn ex_dividend_times(&self) -> &[Time] {
        &self.ex_dividend_times
    }

    /// `(amount, time)` pairs in ex-date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Real, Time)> + '_ {
        self.amounts
            .iter()
            .copied()
            .zip(self.ex_dividend_times.iter().copied())
    }

    /// Undiscounted sum of all amounts.
    pub fn total(&self) -> Real {
        self.amounts.iter().sum()
    }

    /// Sum of the amounts discounted at the continuously compounded `rate`.
    pub fn present_value(&self, rate: Real) -> Real {
        self.iter().map(|(d, t)| d * (-rate * t).exp()).sum()
    }

    /// `Σ tᵢ·Dᵢ·e^{−r tᵢ}`, minus the derivative of the present value with
    /// respect to `rate`.
    pub fn present_value_duration(&self, rate: Real) -> Real {
        self.iter().map(|(d, t)| t * d * (-rate * t).exp()).sum()
    }

    /// Check that every ex-dividend time falls within the option's life.
    ///
    /// # Errors
    /// [`DividendScheduleError::ExDividendAfterExpiry`] for the first
    /// offending entry.
    pub fn check_residual_time(&self, residual_time: Time) -> Result<(), DividendScheduleError> {
        match self
            .ex_dividend_times
            .iter()
            .enumerate()
            .find(|(_, &t)| t > residual_time)
        {
            Some((index, &time)) => Err(DividendScheduleError::ExDividendAfterExpiry {
                index,
                time,
                residual_time,
            }),
            None => Ok(()),
        }
    }

    /// Escrow the schedule against the quoted `spot`.
    ///
    /// # Errors
    /// [`DividendScheduleError::DividendsExceedSpot`] unless
    /// `Σ dividends < spot`.
    pub fn escrow(&self, spot: Real) -> Result<EscrowedSpot, DividendScheduleError> {
        let total = self.total();
        if !(total < spot) {
            return Err(DividendScheduleError::DividendsExceedSpot { total, spot });
        }
        Ok(EscrowedSpot {
            escrowed: spot - total,
            total_dividends: total,
        })
    }
}

/// A spot price split into its escrowed part and the dividends set aside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscrowedSpot {
    escrowed: Real,
    total_dividends: Real,
}

impl EscrowedSpot {
    /// `spot − Σ dividends`: the solver's baseline spot. Always positive.
    pub fn escrowed(&self) -> Real {
        self.escrowed
    }

    /// Escrowed spot plus the sum of all dividends, i.e. the quoted spot.
    /// Fed to the analytic reference pricer.
    pub fn reverse_escrowed(&self) -> Real {
        self.escrowed + self.total_dividends
    }

    /// Undiscounted sum of the escrowed dividends.
    pub fn total_dividends(&self) -> Real {
        self.total_dividends
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawDividendSchedule {
    amounts: Vec<Real>,
    ex_dividend_times: Vec<Time>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDividendSchedule> for DividendSchedule {
    type Error = DividendScheduleError;

    fn try_from(raw: RawDividendSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.amounts, raw.ex_dividend_times)
    }
}

#[cfg(feature = "serde")]
impl From<DividendSchedule> for RawDividendSchedule {
    fn from(s: DividendSchedule) -> Self {
        Self {
            amounts: s.amounts,
            ex_dividend_times: s.ex_dividend_times,
        }
    }
}
