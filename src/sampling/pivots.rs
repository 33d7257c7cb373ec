//! Pivot selection and the sequence-to-pivot distance matrix.
//!
//! Each sequence is embedded as the vector of its distances to `k` randomly
//! chosen pivot sequences. By the triangle inequality, for a metric `d` the
//! Chebyshev distance between two embeddings is a lower bound on `d`
//! itself, which makes pivot space a cheap filter for near neighbours.

use rand::Rng;
use log::info;
use crate::distance::Metric;
use crate::error::{Error, Result};
use crate::utils::parallel::PairEvaluator;

/// `n_pivots` distinct indices from `0..n`, uniformly without replacement.
pub fn select_pivots<R: Rng + ?Sized>(n: usize, n_pivots: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n_pivots == 0 {
        return Err(Error::config("n_pivots must be > 0"));
    }
    if n_pivots > n {
        return Err(Error::config(format!(
            "n_pivots ({}) exceeds the number of sequences ({})", n_pivots, n
        )));
    }
    Ok(rand::seq::index::sample(rng, n, n_pivots).into_vec())
}

/// Row-major `n x k` matrix of distances from every sequence to every pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_pivots: usize,
}

impl PivotMatrix {
    pub fn compute(
        sequences: &[&[f64]],
        pivots: &[usize],
        metric: &Metric,
        evaluator: &PairEvaluator,
    ) -> Self {
        let n_rows = sequences.len();
        let n_pivots = pivots.len();

        let cells: Vec<(usize, usize)> = (0..n_rows)
            .flat_map(|i| (0..n_pivots).map(move |j| (i, j)))
            .collect();
        let data = evaluator.evaluate(&cells, "pivot distances", |i, j| {
            metric.distance(sequences[i], sequences[pivots[j]])
        });

        info!("Embedded {} sequences against {} pivots using {}", n_rows, n_pivots, metric.as_str());
        Self { data, n_rows, n_pivots }
    }

    /// Builds a matrix from precomputed row-major values.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_pivots = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|r| r.len() != n_pivots) {
            return Err(Error::config(format!(
                "pivot matrix rows must share one width: expected {}, found {}", n_pivots, row.len()
            )));
        }
        Ok(Self {
            data: rows.iter().flatten().copied().collect(),
            n_rows: rows.len(),
            n_pivots,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_pivots(&self) -> usize {
        self.n_pivots
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_pivots..(i + 1) * self.n_pivots]
    }
}
