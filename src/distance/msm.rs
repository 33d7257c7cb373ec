//! Move-Split-Merge distance.
//!
//! Edit distance over real-valued sequences with three operations:
//! *move* changes a value (cost `|x_i - y_j|`), *split* duplicates a value
//! and *merge* collapses two equal neighbours. Split and merge cost the
//! constant `c`, plus a penalty when the new point does not lie between its
//! neighbours.
//!
//! ```text
//! D(i, j) = min( D(i-1, j-1) + |x_i - y_j|,
//!                D(i-1, j)   + C(x_i, x_{i-1}, y_j),
//!                D(i, j-1)   + C(y_j, x_i, y_{j-1}) )
//! ```

pub const DEFAULT_MSM_CONSTANT: f64 = 0.5;

/// Cost of inserting `point` next to `left` and `right`.
#[inline]
fn split_merge_cost(point: f64, left: f64, right: f64, constant: f64) -> f64 {
    if (left <= point && point <= right) || (left >= point && point >= right) {
        constant
    } else {
        constant + (point - left).abs().min((point - right).abs())
    }
}

/// MSM distance with split/merge constant `constant`.
///
/// Uses two rolling rows, so memory is `O(|y|)`.
pub fn msm_distance(x: &[f64], y: &[f64], constant: f64) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }
    let m = y.len();

    let mut prev = vec![0.0; m];
    prev[0] = (x[0] - y[0]).abs();
    for j in 1..m {
        prev[j] = prev[j - 1] + split_merge_cost(y[j], x[0], y[j - 1], constant);
    }

    let mut row = vec![0.0; m];
    for i in 1..x.len() {
        row[0] = prev[0] + split_merge_cost(x[i], x[i - 1], y[0], constant);
        for j in 1..m {
            let moved = prev[j - 1] + (x[i] - y[j]).abs();
            let split = prev[j] + split_merge_cost(x[i], x[i - 1], y[j], constant);
            let merged = row[j - 1] + split_merge_cost(y[j], x[i], y[j - 1], constant);
            row[j] = moved.min(split).min(merged);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[m - 1]
}
