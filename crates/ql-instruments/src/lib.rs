//! # ql-instruments
//!
//! Instrument definitions: vanilla options on a single underlying, with or
//! without a schedule of discrete cash dividends, their payoffs and exercise
//! styles, and the `PricingEngine` contract engines implement.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dividend_schedule;
pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use dividend_schedule::{DividendSchedule, EscrowedSpot};
pub use exercise::{Exercise, ExerciseType};
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use option::{
    DividendVanillaOption, DividendVanillaOptionArguments, VanillaOption, VanillaOptionArguments,
};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff, StrikedPayoff};
