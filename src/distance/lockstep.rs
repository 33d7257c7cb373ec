//! Lock-step kernels. Both inputs are truncated to the shorter length.
//!
//! Chebyshev doubles as the pseudo-distance between rows of the pivot
//! distance matrix.

#[inline]
fn paired<'a>(x: &'a [f64], y: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs())
}

/// L2 norm of the difference.
pub fn euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y).map(|d| d * d).sum::<f64>().sqrt()
}

/// Sum of `ln(1 + |x_i - y_i|)`.
pub fn lorentzian_distance(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y).map(|d| d.ln_1p()).sum()
}

/// Maximum absolute difference; `0.0` when either input is empty.
pub fn chebyshev_distance(x: &[f64], y: &[f64]) -> f64 {
    paired(x, y).fold(0.0, f64::max)
}
