//! Dynamic time warping with squared local cost.
//!
//! Returns the square root of the cheapest cumulative alignment cost, so
//! two equal-length sequences aligned on the diagonal give their
//! Euclidean distance.

pub fn dtw_distance(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }
    let m = y.len();

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut row = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for &xi in x {
        row[0] = f64::INFINITY;
        for j in 1..=m {
            let d = xi - y[j - 1];
            let best = prev[j - 1].min(prev[j]).min(row[j - 1]);
            row[j] = d * d + best;
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[m].sqrt()
}
