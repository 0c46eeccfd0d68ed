//! Error types for the dividend option workspace.
//!
//! A single `thiserror`-derived enum covers every failure.  Precondition and
//! postcondition checks go through the `ensure!`, `ensure_post!` and `fail!`
//! macros defined here.  Dividend schedule validation has its own structured
//! error so callers can tell exactly which constraint was violated.

use thiserror::Error;

use crate::{Real, Size, Time};

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The dividend schedule was rejected at construction.
    #[error("invalid dividend schedule: {0}")]
    DividendSchedule(#[from] DividendScheduleError),

    /// Fewer than two strictly positive grid nodes were left to fit a
    /// log-space interpolation through.
    #[error("degenerate interpolation domain: {usable} strictly positive node(s), at least 2 required")]
    DegenerateInterpolation {
        /// Number of nodes that survived the positivity filter.
        usable: Size,
    },
}

/// The constraint a discrete dividend schedule failed to satisfy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DividendScheduleError {
    /// Amounts and ex-dividend times are not paired one to one.
    #[error("the number of dividends ({dividends}) is different from the number of dates ({dates})")]
    CountMismatch {
        /// Number of dividend amounts.
        dividends: Size,
        /// Number of ex-dividend times.
        dates: Size,
    },

    /// A cash amount is negative or not finite.
    #[error("dividend #{index} has invalid amount {amount}")]
    NegativeDividend {
        /// Position in the schedule.
        index: Size,
        /// Offending amount.
        amount: Real,
    },

    /// An ex-dividend time lies before the valuation date.
    #[error("ex-dividend time #{index} ({time}) is negative")]
    NegativeExDividendTime {
        /// Position in the schedule.
        index: Size,
        /// Offending time.
        time: Time,
    },

    /// Ex-dividend times are not strictly increasing.
    #[error("ex-dividend time #{index} ({time}) does not follow {previous}")]
    UnorderedExDividendTimes {
        /// Position in the schedule.
        index: Size,
        /// Offending time.
        time: Time,
        /// Time of the preceding dividend.
        previous: Time,
    },

    /// An ex-dividend time lies beyond the option's residual life.
    #[error("ex-dividend time #{index} ({time}) is after the residual time ({residual_time})")]
    ExDividendAfterExpiry {
        /// Position in the schedule.
        index: Size,
        /// Offending time.
        time: Time,
        /// The option's residual life.
        residual_time: Time,
    },

    /// The escrowed spot `spot − Σ dividends` would not be positive.
    #[error("dividends ({total}) cannot exceed underlying ({spot})")]
    DividendsExceedSpot {
        /// Undiscounted sum of all dividends.
        total: Real,
        /// Quoted spot.
        spot: Real,
    },
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
