//! Conditions applied to the value array after each time step.
//!
//! An early-exercise right makes the option worth at least what exercising
//! it would pay.  The condition is enforced pointwise on every node after
//! each implicit solve and again after each regridding.

use ql_core::{ensure, errors::Result, Rate, Time};
use ql_math::Array;

/// A pointwise constraint enforced on the value array at time `t`.
pub trait StepCondition: std::fmt::Debug {
    /// Constrain `values` in place; `t` is the time the values refer to.
    fn apply_to(&self, values: &mut Array, t: Time) -> Result<()>;
}

fn check_size(values: &Array, intrinsic: &Array) -> Result<()> {
    ensure!(
        values.size() == intrinsic.size(),
        "value array ({}) and intrinsic values ({}) differ in size",
        values.size(),
        intrinsic.size()
    );
    Ok(())
}

/// American exercise: `v = max(v, intrinsic)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AmericanCondition {
    intrinsic: Array,
}

impl AmericanCondition {
    /// Condition flooring values at `intrinsic`, the payoff on the grid.
    pub fn new(intrinsic: Array) -> Self {
        Self { intrinsic }
    }
}

impl StepCondition for AmericanCondition {
    fn apply_to(&self, values: &mut Array, _t: Time) -> Result<()> {
        check_size(values, &self.intrinsic)?;
        for (v, &floor) in values.as_mut_slice().iter_mut().zip(self.intrinsic.iter()) {
            *v = v.max(floor);
        }
        Ok(())
    }
}

/// Shout right: the holder can lock in the intrinsic value at `t` and be
/// paid it at expiry, so `v = max(v, e^{−r(T−t)}·intrinsic)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoutCondition {
    intrinsic: Array,
    residual_time: Time,
    rate: Rate,
}

impl ShoutCondition {
    /// Condition for an option expiring at `residual_time`, discounting at
    /// `rate`.
    pub fn new(intrinsic: Array, residual_time: Time, rate: Rate) -> Self {
        Self {
            intrinsic,
            residual_time,
            rate,
        }
    }
}

impl StepCondition for ShoutCondition {
    fn apply_to(&self, values: &mut Array, t: Time) -> Result<()> {
        check_size(values, &self.intrinsic)?;
        ensure!(
            t <= self.residual_time,
            "shout time {t} is after expiry {}",
            self.residual_time
        );
        let discount = (-self.rate * (self.residual_time - t)).exp();
        for (v, &payoff) in values.as_mut_slice().iter_mut().zip(self.intrinsic.iter()) {
            *v = v.max(discount * payoff);
        }
        Ok(())
    }
}
