//! Control-variate correction of finite-difference results.
//!
//! Alongside the primary solution the engines roll back a control solution:
//! the European version of the same option, on the same grids, never
//! constrained by early exercise.  Its closed-form price is known, so the
//! discretisation error it carries can be removed from the primary result.

use ql_core::{errors::Result, Real};
use ql_math::Array;
use ql_methods::{first_derivative_at_center, second_derivative_at_center, value_at_center};

use crate::analytic_european_engine::BlackScholesResults;

/// Analytic anchor for the control solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlVariate {
    analytic: BlackScholesResults,
}

impl ControlVariate {
    /// Anchor the correction on the closed-form results of the control
    /// instrument.
    pub fn new(analytic: BlackScholesResults) -> Self {
        Self { analytic }
    }

    /// The closed-form results.
    pub fn analytic(&self) -> &BlackScholesResults {
        &self.analytic
    }

    /// `numeric(primary) − numeric(control) + analytic` for the value, delta
    /// and gamma at the centre of `grid`.
    pub fn correct(
        &self,
        prices: &Array,
        control_prices: &Array,
        grid: &Array,
    ) -> Result<CorrectedGreeks> {
        let value =
            value_at_center(prices)? - value_at_center(control_prices)? + self.analytic.value;
        let delta = first_derivative_at_center(prices, grid)?
            - first_derivative_at_center(control_prices, grid)?
            + self.analytic.delta;
        let gamma = second_derivative_at_center(prices, grid)?
            - second_derivative_at_center(control_prices, grid)?
            + self.analytic.gamma;
        Ok(CorrectedGreeks { value, delta, gamma })
    }
}

/// Control-corrected value, delta and gamma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedGreeks {
    /// Option value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_methods::log_grid;

    #[test]
    fn identical_solutions_give_the_analytic_anchor() {
        let anchor = BlackScholesResults {
            value: 7.5,
            delta: 0.4,
            gamma: 0.03,
            ..BlackScholesResults::default()
        };
        let grid = log_grid(50.0, 200.0, 11).unwrap();
        let prices = grid.map(|s| (s - 100.0).max(0.0));
        let corrected = ControlVariate::new(anchor)
            .correct(&prices, &prices, &grid)
            .unwrap();
        assert_eq!(corrected.value, 7.5);
        assert_eq!(corrected.delta, 0.4);
        assert_eq!(corrected.gamma, 0.03);
    }

    #[test]
    fn early_exercise_premium_is_added_to_the_anchor() {
        let anchor = BlackScholesResults {
            value: 5.0,
            ..BlackScholesResults::default()
        };
        let grid = log_grid(50.0, 200.0, 11).unwrap();
        let control = grid.map(|s| 0.1 * s);
        let prices = &control + 0.25;
        let corrected = ControlVariate::new(anchor)
            .correct(&prices, &control, &grid)
            .unwrap();
        assert_abs_diff_eq!(corrected.value, 5.25, epsilon = 1e-12);
        assert_abs_diff_eq!(corrected.delta, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corrected.gamma, 0.0, epsilon = 1e-12);
    }
}
