//! Grid bounds across an ex-dividend date.
//!
//! Moving back over a dividend `D` the asset is worth `D` more, so the grid
//! centre moves up by `D`.  The new domain starts from the natural bounds for
//! the time left; its lower edge is then raised to the previous lower edge
//! plus `D` whenever that is higher, with the upper edge re-symmetrised
//! around the new centre.  The lower edge therefore never moves down from
//! one period to the next.

use ql_core::{errors::Result, Real, Time, Volatility};
use ql_methods::GridBounds;

/// Bounds for the period ending at an ex-dividend date.
///
/// `previous` are the bounds of the period after the date, `dividend` the
/// cash amount going ex and `time` the ex-dividend time.
pub fn ratchet_bounds(
    previous: &GridBounds,
    dividend: Real,
    strike: Real,
    volatility: Volatility,
    time: Time,
) -> Result<GridBounds> {
    let center = previous.center() + dividend;
    let natural = GridBounds::natural(center, strike, volatility, time)?;
    let candidate = previous.s_min() + dividend;
    if candidate > natural.s_min() {
        GridBounds::from_lower(center, candidate)
    } else {
        Ok(natural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn shifted_lower_bound_wins_when_higher() {
        let previous = GridBounds::natural(95.0, 100.0, 0.2, 1.0).unwrap();
        let next = ratchet_bounds(&previous, 5.0, 100.0, 0.2, 0.5).unwrap();
        let natural = GridBounds::natural(100.0, 100.0, 0.2, 0.5).unwrap();
        // Less time left narrows the natural domain, so the natural bound is
        // higher than the shifted one here.
        assert!(previous.s_min() + 5.0 < natural.s_min());
        assert_eq!(next, natural);

        let wide = GridBounds::from_lower(95.0, 90.0).unwrap();
        let next = ratchet_bounds(&wide, 5.0, 100.0, 0.2, 0.5).unwrap();
        assert_relative_eq!(next.s_min(), 95.0, max_relative = 1e-15);
        assert_relative_eq!(next.s_min() * next.s_max(), 1.0e4, max_relative = 1e-12);
        assert_eq!(next.center(), 100.0);
    }

    #[test]
    fn zero_dividend_keeps_the_centre() {
        let previous = GridBounds::natural(100.0, 100.0, 0.3, 1.0).unwrap();
        let next = ratchet_bounds(&previous, 0.0, 100.0, 0.3, 0.25).unwrap();
        assert_eq!(next.center(), 100.0);
        assert!(next.s_min() >= previous.s_min());
    }

    proptest! {
        #[test]
        fn lower_bound_never_decreases(
            spot in 20.0f64..200.0,
            strike in 20.0f64..200.0,
            vol in 0.05f64..0.8,
            dividends in prop::collection::vec(0.0f64..5.0, 1..8),
        ) {
            let n = dividends.len();
            let total: Real = dividends.iter().sum();
            let escrowed = spot + 1.0 - total.min(spot);
            let mut bounds = GridBounds::natural(escrowed, strike, vol, 1.0).unwrap();
            for (i, &d) in dividends.iter().enumerate().rev() {
                let time = (i + 1) as Time / (n + 1) as Time;
                let next = ratchet_bounds(&bounds, d, strike, vol, time).unwrap();
                prop_assert!(next.s_min() >= bounds.s_min());
                prop_assert!(next.s_min() < next.center());
                prop_assert!((next.s_min() * next.s_max() / (next.center() * next.center()) - 1.0).abs() < 1e-9);
                bounds = next;
            }
        }
    }
}
