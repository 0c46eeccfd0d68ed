//! Crank-Nicolson rollback of a value array under a tridiagonal operator.
//!
//! Each step solves `(I − ½Δt L) Vⁿ = (I + ½Δt L) Vⁿ⁺¹`.  The boundary
//! conditions are restored after the explicit half and imposed on the
//! implicit system before solving.

use ql_core::{ensure, errors::Result, Size, Time};
use ql_math::Array;

use super::{NeumannBoundary, StepCondition, TridiagonalOperator};

/// Times closer than this are treated as equal when landing on `to`.
const TIME_TOLERANCE: Time = 1.0e-10;

/// A spatial operator with its boundary conditions, ready to roll values
/// back in time.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceModel {
    operator: TridiagonalOperator,
    boundaries: Vec<NeumannBoundary>,
}

impl FiniteDifferenceModel {
    /// Model for `∂V/∂t + L V = 0` with `L = operator`.
    pub fn new(operator: TridiagonalOperator, boundaries: Vec<NeumannBoundary>) -> Self {
        Self {
            operator,
            boundaries,
        }
    }

    /// The spatial operator `L`.
    pub fn operator(&self) -> &TridiagonalOperator {
        &self.operator
    }

    /// Evolve `values` from time `from` back to `to` in `steps` equal steps.
    ///
    /// When given, `condition` is applied after every step at the time just
    /// reached, including `to` itself.
    pub fn rollback(
        &self,
        mut values: Array,
        from: Time,
        to: Time,
        steps: Size,
        condition: Option<&dyn StepCondition>,
    ) -> Result<Array> {
        ensure!(from >= to, "cannot roll back from {from} to later time {to}");
        ensure!(steps > 0, "rollback needs at least one time step");
        ensure!(
            values.size() == self.operator.size(),
            "value array ({}) does not match operator size ({})",
            values.size(),
            self.operator.size()
        );
        tracing::trace!(from, to, steps, "rollback");

        let dt = (from - to) / steps as Time;
        let explicit = self.operator.identity_plus_scaled(0.5 * dt);
        let mut implicit = self.operator.identity_plus_scaled(-0.5 * dt);

        for i in 0..steps {
            let now = from - i as Time * dt;
            let mut next = now - dt;
            if (to - next).abs() < TIME_TOLERANCE {
                next = to;
            }

            let mut rhs = explicit.apply(&values)?;
            for bc in &self.boundaries {
                bc.apply_after_applying(&mut rhs);
                bc.apply_before_solving(&mut implicit, &mut rhs);
            }
            values = implicit.solve_for(&rhs)?;

            if let Some(condition) = condition {
                condition.apply_to(&mut values, next)?;
            }
        }
        Ok(values)
    }
}
