//! Kernelized dynamic time warping.
//!
//! KDTW sums a local Gaussian-like kernel over all alignment paths instead
//! of taking the single cheapest one, and adds a cumulative diagonal term
//! that regularizes the sum. The similarity is turned into a distance as
//! `1 - K(x, y)`, optionally normalized by the self-similarities:
//!
//! ```text
//! d(x, y) = 1 - K(x, y) / sqrt(K(x, x) * K(y, y))
//! ```

use serde::{Serialize, Deserialize};

// 1/c in Marteau & Gibet's formulation.
const LOCAL_KERNEL_FACTOR: f64 = 1.0 / 3.0;

// Self-similarities below this are treated as this value.
const MIN_NORM_FACTOR: f64 = f64::MIN_POSITIVE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdtwParams {
    /// Bandwidth of the local kernel.
    pub gamma: f64,
    /// Additive floor on the local kernel, keeps long alignments non-zero.
    pub epsilon: f64,
    /// Z-normalize each input before comparison.
    pub normalize_input: bool,
    /// Divide by the geometric mean of the self-similarities.
    pub normalize_distance: bool,
}

impl Default for KdtwParams {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            epsilon: 1e-20,
            normalize_input: true,
            normalize_distance: true,
        }
    }
}

fn z_normalize(x: &[f64]) -> Vec<f64> {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let std = (x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();
    x.iter().map(|v| (v - mean) / (std + f64::EPSILON)).collect()
}

/// Unnormalized KDTW similarity `K(x, y)`.
fn kdtw_similarity(x: &[f64], y: &[f64], gamma: f64, epsilon: f64) -> f64 {
    let local = |i: usize, j: usize| {
        let d = x[i] - y[j];
        LOCAL_KERNEL_FACTOR * ((-(d * d) / gamma).exp() + epsilon)
    };

    // One extra row and column for the initial conditions.
    let n = x.len() + 1;
    let m = y.len() + 1;

    let mut diagonal_weights = vec![0.0; n.max(m)];
    diagonal_weights[0] = 1.0;
    for i in 1..n.min(m) {
        diagonal_weights[i] = local(i - 1, i - 1);
    }

    let mut prev_cost = vec![0.0; m];
    let mut prev_diag = vec![0.0; m];
    prev_cost[0] = 1.0;
    prev_diag[0] = 1.0;
    for j in 1..m {
        prev_cost[j] = prev_cost[j - 1] * local(0, j - 1);
        prev_diag[j] = prev_diag[j - 1] * diagonal_weights[j];
    }

    let mut cost = vec![0.0; m];
    let mut diag = vec![0.0; m];
    for i in 1..n {
        cost[0] = prev_cost[0] * local(i - 1, 0);
        diag[0] = prev_diag[0] * diagonal_weights[i];
        for j in 1..m {
            let local_cost = local(i - 1, j - 1);
            cost[j] = (prev_cost[j] + cost[j - 1] + prev_cost[j - 1]) * local_cost;
            diag[j] = prev_diag[j] * diagonal_weights[i] + diag[j - 1] * diagonal_weights[j];
            if i == j {
                diag[j] += prev_diag[j - 1] * local_cost;
            }
        }
        std::mem::swap(&mut prev_cost, &mut cost);
        std::mem::swap(&mut prev_diag, &mut diag);
    }

    prev_cost[m - 1] + prev_diag[m - 1]
}

/// KDTW distance, never negative. With `normalize_distance` the result lies in `[0, 1]`.
pub fn kdtw_distance(x: &[f64], y: &[f64], params: &KdtwParams) -> f64 {
    if x.is_empty() || y.is_empty() {
        return 0.0;
    }

    let (x, y) = if params.normalize_input {
        (z_normalize(x), z_normalize(y))
    } else {
        (x.to_vec(), y.to_vec())
    };

    let similarity = kdtw_similarity(&x, &y, params.gamma, params.epsilon);
    if !params.normalize_distance {
        // K(x, y) is unbounded above, so 1 - K can dip below zero.
        return (1.0 - similarity).max(0.0);
    }

    let self_x = kdtw_similarity(&x, &x, params.gamma, params.epsilon);
    let self_y = kdtw_similarity(&y, &y, params.gamma, params.epsilon);
    let norm_factor = (self_x * self_y).sqrt().max(MIN_NORM_FACTOR);

    (1.0 - similarity / norm_factor).clamp(0.0, 1.0)
}
