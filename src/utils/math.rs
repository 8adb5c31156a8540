//! Additional math helpers layered on top of `glam`.

use glam::{DMat2, DVec2};

/// Folds `value` into `[lower, lower + period)` and returns how many periods were removed.
///
/// A positive count means the value was shifted down. Non-finite input is returned unchanged
/// with a count of zero.
pub fn fold_periodic(value: f64, period: f64, lower: f64) -> (f64, i64) {
    if !value.is_finite() || period <= 0.0 {
        return (value, 0);
    }
    let mut count = ((value - lower) / period).floor() as i64;
    let mut folded = value - count as f64 * period;
    // floor() can land one period off when the value sits on an edge
    if folded >= lower + period {
        folded -= period;
        count += 1;
    } else if folded < lower {
        folded += period;
        count -= 1;
    }
    (folded, count)
}

/// Outer product `a ⊗ b`, i.e. the matrix whose `[i][j]` entry is `a_i * b_j`.
pub fn outer(a: DVec2, b: DVec2) -> DMat2 {
    DMat2::from_cols(a * b.x, a * b.y)
}

/// Entry `[row][col]` of a column-major `glam` matrix.
#[inline]
pub fn entry(m: &DMat2, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// Unit vector at `angle` radians from the x axis.
#[inline]
pub fn unit_from_angle(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}
