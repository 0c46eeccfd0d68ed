//! Option exercise styles.
//!
//! Times are year fractions from the valuation date; the exercise records
//! the option's residual life and which early-exercise right, if any, the
//! holder has before it ends.

use ql_core::Time;
use std::fmt;

/// Type of exercise right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseType {
    /// Can only be exercised at expiry.
    European,
    /// Can be exercised at any time up to expiry.
    American,
    /// The holder may once lock in the current intrinsic value, paid at
    /// expiry.
    Shout,
}

/// Exercise specification for an option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exercise {
    exercise_type: ExerciseType,
    residual_time: Time,
}

impl Exercise {
    /// Exercise of the given type, expiring in `residual_time` years.
    pub fn new(exercise_type: ExerciseType, residual_time: Time) -> Self {
        Self {
            exercise_type,
            residual_time,
        }
    }

    /// Exercise at expiry only.
    pub fn european(residual_time: Time) -> Self {
        Self::new(ExerciseType::European, residual_time)
    }

    /// Exercise at any time up to expiry.
    pub fn american(residual_time: Time) -> Self {
        Self::new(ExerciseType::American, residual_time)
    }

    /// A shout right exercisable up to expiry.
    pub fn shout(residual_time: Time) -> Self {
        Self::new(ExerciseType::Shout, residual_time)
    }

    /// The type of exercise.
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    /// Years until expiry.
    pub fn residual_time(&self) -> Time {
        self.residual_time
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}y)", self.exercise_type, self.residual_time)
    }
}
