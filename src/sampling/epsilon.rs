//! Radius estimation in pivot space.
//!
//! Draws as many random pairs as there are sequences, measures their
//! Chebyshev distance in pivot space and returns the `s * m` quantile. Pairs
//! within that radius are roughly the `s * m` fraction of all pairs that
//! look closest, which is the share of the edge budget reserved for
//! neighbour search. When that share is the whole budget (`s * m >= 1`)
//! the radius is unbounded and every pair becomes a neighbour.

use rand::Rng;
use log::{debug, info, warn};
use crate::distance::chebyshev_distance;
use crate::sampling::pivots::PivotMatrix;
use crate::utils::parallel::PairEvaluator;

/// Linear-interpolation quantile (numpy's default) of an unsorted sample.
///
/// `q` is clamped into `[0, 1]`. Returns `None` for an empty sample.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// `count` uniformly random index pairs from `0..n` with self pairs removed.
pub fn random_pairs<R: Rng + ?Sized>(n: usize, count: usize, rng: &mut R) -> Vec<(usize, usize)> {
    (0..count)
        .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
        .filter(|(i, j)| i != j)
        .collect()
}

pub fn estimate_epsilon<R: Rng + ?Sized>(
    pivot_matrix: &PivotMatrix,
    s: f64,
    m: f64,
    rng: &mut R,
    evaluator: &PairEvaluator,
) -> f64 {
    let n = pivot_matrix.n_rows();
    if n < 2 {
        return 0.0;
    }
    if s * m >= 1.0 {
        info!("Neighbour search covers the whole edge budget; epsilon is unbounded");
        return f64::INFINITY;
    }

    let pairs = random_pairs(n, n, rng);
    debug!("Sampled {} of {} pairs for epsilon estimation", pairs.len(), n);

    let pseudo_distances = evaluator.evaluate(&pairs, "pseudo distances", |i, j| {
        chebyshev_distance(pivot_matrix.row(i), pivot_matrix.row(j))
    });

    match quantile(&pseudo_distances, s * m) {
        Some(epsilon) => {
            info!("Estimated epsilon {:.6} at quantile {:.4}", epsilon, s * m);
            epsilon
        }
        None => {
            warn!("Every sampled pair was a self pair; using epsilon 0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessorConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_quantile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[7.0], 0.3), Some(7.0));
    }

    #[test]
    fn test_random_pairs_drop_self_pairs() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pairs = random_pairs(3, 200, &mut rng);
        assert!(!pairs.is_empty());
        assert!(pairs.len() < 200);
        assert!(pairs.iter().all(|(i, j)| i != j && *i < 3 && *j < 3));
    }

    #[test]
    fn test_epsilon_within_observed_range() {
        let rows: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let evaluator = PairEvaluator::new(&ProcessorConfig::default(), false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let epsilon = estimate_epsilon(&matrix, 0.5, 0.1, &mut rng, &evaluator);
        assert!(epsilon >= 1.0 - 1e-12);
        assert!(epsilon <= 39.0);
    }

    #[test]
    fn test_high_quantile_is_near_sample_maximum() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![(i * i) as f64]).collect();
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let evaluator = PairEvaluator::new(&ProcessorConfig::default(), false).unwrap();

        let epsilon = estimate_epsilon(&matrix, 1.0, 0.99, &mut ChaCha8Rng::seed_from_u64(9), &evaluator);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let sample: Vec<f64> = random_pairs(10, 10, &mut rng)
            .iter()
            .map(|&(i, j)| (rows[i][0] - rows[j][0]).abs())
            .collect();
        assert_eq!(Some(epsilon), quantile(&sample, 0.99));
    }

    #[test]
    fn test_full_budget_is_unbounded() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let evaluator = PairEvaluator::new(&ProcessorConfig::default(), false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(estimate_epsilon(&matrix, 1.0, 1.0, &mut rng, &evaluator), f64::INFINITY);
        // Nothing is drawn, so the generator stream is untouched.
        let mut fresh = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(random_pairs(10, 5, &mut rng), random_pairs(10, 5, &mut fresh));
    }
}
