use std::ops::{Add, AddAssign, Mul, Neg};

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use crate::utils::math::{entry, outer};

/// 2x2 stress tensor in Pa·m (force per unit length of depth).
///
/// `component(i, j)` is the row-`i`, column-`j` entry; index 0 is x and 1 is y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressTensor(pub DMat2);

impl Default for StressTensor {
    fn default() -> Self {
        Self::ZERO
    }
}

impl StressTensor {
    pub const ZERO: Self = Self(DMat2::ZERO);

    pub fn from_rows(rows: [[f64; 2]; 2]) -> Self {
        Self(DMat2::from_cols(
            DVec2::new(rows[0][0], rows[1][0]),
            DVec2::new(rows[0][1], rows[1][1]),
        ))
    }

    /// Dyadic product `a ⊗ b`.
    pub fn dyad(a: DVec2, b: DVec2) -> Self {
        Self(outer(a, b))
    }

    pub fn diagonal(value: f64) -> Self {
        Self(DMat2::from_diagonal(DVec2::splat(value)))
    }

    /// Antisymmetric tensor with `[0][1] = -value` and `[1][0] = value`.
    pub fn antisymmetric(value: f64) -> Self {
        Self::from_rows([[0.0, -value], [value, 0.0]])
    }

    pub fn component(&self, row: usize, col: usize) -> f64 {
        entry(&self.0, row, col)
    }

    pub fn xx(&self) -> f64 {
        self.component(0, 0)
    }

    pub fn xy(&self) -> f64 {
        self.component(0, 1)
    }

    pub fn yx(&self) -> f64 {
        self.component(1, 0)
    }

    pub fn yy(&self) -> f64 {
        self.component(1, 1)
    }

    pub fn rows(&self) -> [[f64; 2]; 2] {
        [[self.xx(), self.xy()], [self.yx(), self.yy()]]
    }

    pub fn is_zero(&self) -> bool {
        self.0 == DMat2::ZERO
    }
}

impl Add for StressTensor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for StressTensor {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Neg for StressTensor {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for StressTensor {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}
