//! Logarithmic asset grids and readings at their centre node.
//!
//! A grid spans `[s_min, s_max]` with `s_min · s_max = center²`, so an odd
//! number of log-uniform nodes puts the middle node exactly on `center`.

use ql_core::{ensure, errors::Result, Real, Size, Time, Volatility};
use ql_math::Array;

/// Width of the domain in standard deviations on each side of the centre.
const STANDARD_DEVIATIONS: Real = 4.0;
/// Extra log-width added to the volatility term, keeping short-dated grids
/// from collapsing onto the centre.
const MIN_LOG_WIDTH: Real = 0.02;
/// The strike must sit at least this factor inside the domain.
const SAFETY_ZONE_FACTOR: Real = 1.1;
/// Minimum number of grid points for options up to one year.
const MIN_GRID_POINTS: Size = 10;

/// Lower and upper asset bounds of a grid together with its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    s_min: Real,
    s_max: Real,
    center: Real,
}

impl GridBounds {
    /// Natural bounds for `center` when `time` remains to be rolled back.
    ///
    /// The domain covers `center·exp(±4(σ√t + 0.02))`, widened where needed
    /// so that the strike lies inside it by a 1.1 factor.  Every adjustment
    /// of one bound re-symmetrises the other around `center`.
    pub fn natural(
        center: Real,
        strike: Real,
        volatility: Volatility,
        time: Time,
    ) -> Result<Self> {
        ensure!(center > 0.0, "grid centre must be positive, got {center}");
        ensure!(strike > 0.0, "strike must be positive, got {strike}");
        ensure!(time >= 0.0, "time must be non-negative, got {time}");
        let vol_sqrt_time = volatility * time.sqrt();
        let factor = (STANDARD_DEVIATIONS * (vol_sqrt_time + MIN_LOG_WIDTH)).exp();
        let mut bounds = Self {
            s_min: center / factor,
            s_max: center * factor,
            center,
        };
        if bounds.s_min > strike / SAFETY_ZONE_FACTOR {
            bounds = Self::from_lower(center, strike / SAFETY_ZONE_FACTOR)?;
        }
        if bounds.s_max < strike * SAFETY_ZONE_FACTOR {
            bounds = Self::from_upper(center, strike * SAFETY_ZONE_FACTOR)?;
        }
        Ok(bounds)
    }

    /// Bounds with the given lower edge, symmetric in log space about `center`.
    pub fn from_lower(center: Real, s_min: Real) -> Result<Self> {
        ensure!(
            s_min > 0.0 && s_min < center,
            "lower bound {s_min} must lie in (0, {center})"
        );
        Ok(Self {
            s_min,
            s_max: center * center / s_min,
            center,
        })
    }

    /// Bounds with the given upper edge, symmetric in log space about `center`.
    pub fn from_upper(center: Real, s_max: Real) -> Result<Self> {
        ensure!(s_max > center, "upper bound {s_max} must exceed {center}");
        Ok(Self {
            s_min: center * center / s_max,
            s_max,
            center,
        })
    }

    /// Lower asset bound.
    pub fn s_min(&self) -> Real {
        self.s_min
    }

    /// Upper asset bound.
    pub fn s_max(&self) -> Real {
        self.s_max
    }

    /// Centre of the domain.
    pub fn center(&self) -> Real {
        self.center
    }

    /// `n` log-uniform nodes spanning the bounds.
    pub fn grid(&self, n: Size) -> Result<Array> {
        log_grid(self.s_min, self.s_max, n)
    }
}

/// `n` nodes, uniformly spaced in `ln S`, from `s_min` to `s_max`.
pub fn log_grid(s_min: Real, s_max: Real, n: Size) -> Result<Array> {
    ensure!(n >= 3, "a grid needs at least 3 points, got {n}");
    ensure!(
        s_min > 0.0 && s_max > s_min,
        "invalid grid bounds [{s_min}, {s_max}]"
    );
    let x_min = s_min.ln();
    let dx = (s_max.ln() - x_min) / (n - 1) as Real;
    Ok(Array::from_fn(n, |i| (x_min + i as Real * dx).exp()))
}

/// Grid size actually used for an option with `residual_time` years left.
///
/// Long-dated options get a floor that grows with `ln(residual_time)`; the
/// result is always odd so the centre lands on a node.
pub fn safe_grid_points(grid_points: Size, residual_time: Time) -> Size {
    let floor = if residual_time > 1.0 {
        (MIN_GRID_POINTS as Real * (1.0 + residual_time.ln())).ceil() as Size
    } else {
        MIN_GRID_POINTS
    };
    let n = grid_points.max(floor);
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Value of `a` at the centre of its grid.
pub fn value_at_center(a: &Array) -> Result<Real> {
    let n = a.size();
    ensure!(n >= 1, "cannot read the centre of an empty array");
    let jmid = n / 2;
    if n % 2 == 1 {
        Ok(a[jmid])
    } else {
        Ok(0.5 * (a[jmid] + a[jmid - 1]))
    }
}

/// `∂a/∂S` at the centre of `grid`.
pub fn first_derivative_at_center(a: &Array, grid: &Array) -> Result<Real> {
    let n = a.size();
    ensure!(
        n == grid.size(),
        "values ({n}) and grid ({}) differ in size",
        grid.size()
    );
    ensure!(n >= 3, "need at least 3 points for a first derivative, got {n}");
    let jmid = n / 2;
    if n % 2 == 1 {
        Ok((a[jmid + 1] - a[jmid - 1]) / (grid[jmid + 1] - grid[jmid - 1]))
    } else {
        Ok((a[jmid] - a[jmid - 1]) / (grid[jmid] - grid[jmid - 1]))
    }
}

/// `∂²a/∂S²` at the centre of `grid`.
pub fn second_derivative_at_center(a: &Array, grid: &Array) -> Result<Real> {
    let n = a.size();
    ensure!(
        n == grid.size(),
        "values ({n}) and grid ({}) differ in size",
        grid.size()
    );
    ensure!(n >= 4, "need at least 4 points for a second derivative, got {n}");
    let jmid = n / 2;
    if n % 2 == 1 {
        let delta_plus = (a[jmid + 1] - a[jmid]) / (grid[jmid + 1] - grid[jmid]);
        let delta_minus = (a[jmid] - a[jmid - 1]) / (grid[jmid] - grid[jmid - 1]);
        let ds = 0.5 * (grid[jmid + 1] - grid[jmid - 1]);
        Ok((delta_plus - delta_minus) / ds)
    } else {
        let delta_plus = (a[jmid + 1] - a[jmid - 1]) / (grid[jmid + 1] - grid[jmid - 1]);
        let delta_minus = (a[jmid] - a[jmid - 2]) / (grid[jmid] - grid[jmid - 2]);
        Ok((delta_plus - delta_minus) / (grid[jmid] - grid[jmid - 1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn log_grid_is_centred_and_log_uniform() {
        let bounds = GridBounds::from_lower(100.0, 50.0).unwrap();
        let grid = bounds.grid(11).unwrap();
        assert_relative_eq!(grid[0], 50.0, max_relative = 1e-14);
        assert_relative_eq!(grid[10], 200.0, max_relative = 1e-12);
        assert_relative_eq!(grid[5], 100.0, max_relative = 1e-14);
        assert!(grid.is_strictly_increasing());
        let r = grid[1] / grid[0];
        for i in 1..10 {
            assert_relative_eq!(grid[i + 1] / grid[i], r, max_relative = 1e-12);
        }
    }

    #[test]
    fn natural_bounds_without_strike_adjustment() {
        let b = GridBounds::natural(100.0, 100.0, 0.2, 1.0).unwrap();
        let f = (4.0_f64 * (0.2 + 0.02)).exp();
        assert_relative_eq!(b.s_min(), 100.0 / f, max_relative = 1e-14);
        assert_relative_eq!(b.s_max(), 100.0 * f, max_relative = 1e-14);
        assert_relative_eq!(b.s_min() * b.s_max(), 1.0e4, max_relative = 1e-12);
    }

    #[test]
    fn natural_bounds_cover_a_distant_strike() {
        // Tiny vol: the natural domain is narrow, the strike pushes it out.
        let low = GridBounds::natural(100.0, 60.0, 0.01, 0.1).unwrap();
        assert_relative_eq!(low.s_min(), 60.0 / 1.1, max_relative = 1e-14);
        assert_relative_eq!(low.s_min() * low.s_max(), 1.0e4, max_relative = 1e-12);

        let high = GridBounds::natural(100.0, 150.0, 0.01, 0.1).unwrap();
        assert_relative_eq!(high.s_max(), 165.0, max_relative = 1e-14);
        assert_relative_eq!(high.s_min() * high.s_max(), 1.0e4, max_relative = 1e-12);
    }

    #[test]
    fn natural_bounds_at_time_zero() {
        let b = GridBounds::natural(100.0, 100.0, 0.3, 0.0).unwrap();
        assert!(b.s_min() < 100.0 / 1.1 + 1e-12);
        assert!(b.s_max() > 110.0 - 1e-12);
    }

    #[test]
    fn safe_grid_points_are_odd_and_floored() {
        assert_eq!(safe_grid_points(100, 1.0), 101);
        assert_eq!(safe_grid_points(101, 0.5), 101);
        assert_eq!(safe_grid_points(3, 0.5), 11);
        assert!(safe_grid_points(3, 20.0) > 30);
        assert_eq!(safe_grid_points(3, 20.0) % 2, 1);
    }

    #[test]
    fn centre_readings_on_a_quadratic() {
        let grid = log_grid(80.0, 125.0, 101).unwrap();
        let a = grid.map(|s| 0.5 * s * s);
        assert_abs_diff_eq!(value_at_center(&a).unwrap(), 0.5 * grid[50] * grid[50], epsilon = 1e-12);
        assert_relative_eq!(first_derivative_at_center(&a, &grid).unwrap(), grid[50], max_relative = 1e-4);
        assert_relative_eq!(second_derivative_at_center(&a, &grid).unwrap(), 1.0, max_relative = 1e-3);
    }

    #[test]
    fn centre_readings_with_an_even_size() {
        let grid = Array::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let a = Array::from_slice(&[1.0, 4.0, 9.0, 16.0]);
        assert_eq!(value_at_center(&a).unwrap(), 6.5);
        assert_eq!(first_derivative_at_center(&a, &grid).unwrap(), 5.0);
        // ((16 − 4)/2 − (9 − 1)/2) / 1
        assert_eq!(second_derivative_at_center(&a, &grid).unwrap(), 2.0);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(log_grid(0.0, 10.0, 5).is_err());
        assert!(log_grid(10.0, 5.0, 5).is_err());
        assert!(log_grid(1.0, 5.0, 2).is_err());
        assert!(GridBounds::from_lower(100.0, 120.0).is_err());
    }
}
