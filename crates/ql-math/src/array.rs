//! `Array`: a one-dimensional vector of reals.
//!
//! Thin newtype around `nalgebra::DVector<f64>`.  The finite-difference code
//! stores both grids (asset-price nodes) and value functions in it.

use nalgebra::DVector;
use ql_core::Real;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// A dynamically-sized 1D vector of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array(DVector<Real>);

impl Array {
    /// Create a zero-filled array of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(DVector::zeros(n))
    }

    /// Create an array from a slice.
    pub fn from_slice(data: &[Real]) -> Self {
        Self(DVector::from_column_slice(data))
    }

    /// Create an array from a `Vec`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// Create an array of length `n` whose `i`-th element is `f(i)`.
    pub fn from_fn<F: FnMut(usize) -> Real>(n: usize, mut f: F) -> Self {
        Self(DVector::from_fn(n, |i, _| f(i)))
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the elements as a slice.
    pub fn as_slice(&self) -> &[Real] {
        self.0.as_slice()
    }

    /// Return the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Real] {
        self.0.as_mut_slice()
    }

    /// First element, if any.
    pub fn first(&self) -> Option<Real> {
        self.as_slice().first().copied()
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<Real> {
        self.as_slice().last().copied()
    }

    /// Minimum element.
    pub fn min(&self) -> Real {
        self.0.min()
    }

    /// Maximum element.
    pub fn max(&self) -> Real {
        self.0.max()
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Array) -> Real {
        (&self.0 - &other.0).amax()
    }

    /// `true` if every element is larger than its predecessor.
    pub fn is_strictly_increasing(&self) -> bool {
        self.as_slice().windows(2).all(|w| w[1] > w[0])
    }

    /// Apply a function element-wise, returning a new array.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Combine two equally sized arrays element-wise.
    pub fn zip_map<F: Fn(Real, Real) -> Real>(&self, other: &Array, f: F) -> Self {
        Self(self.0.zip_map(&other.0, f))
    }

    /// Iterator over elements.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }
}

impl From<Vec<Real>> for Array {
    fn from(v: Vec<Real>) -> Self {
        Self::from_vec(v)
    }
}

impl From<&[Real]> for Array {
    fn from(s: &[Real]) -> Self {
        Self::from_slice(s)
    }
}

impl FromIterator<Real> for Array {
    fn from_iter<I: IntoIterator<Item = Real>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Array {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<usize> for Array {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        &mut self.0[i]
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

/// Shift every element by a scalar, e.g. moving grid nodes across an
/// ex-dividend date.
impl Add<Real> for &Array {
    type Output = Array;
    fn add(self, rhs: Real) -> Array {
        Array(self.0.add_scalar(rhs))
    }
}

impl Add<Real> for Array {
    type Output = Array;
    fn add(self, rhs: Real) -> Array {
        Array(self.0.add_scalar(rhs))
    }
}

impl Sub for &Array {
    type Output = Array;
    fn sub(self, rhs: &Array) -> Array {
        Array(&self.0 - &rhs.0)
    }
}

impl Mul<Real> for &Array {
    type Output = Array;
    fn mul(self, rhs: Real) -> Array {
        Array(&self.0 * rhs)
    }
}
