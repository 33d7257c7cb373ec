//! Neighbour discovery in pivot space.
//!
//! Only pairs whose pivot-space rows lie within `epsilon` of each other
//! (Chebyshev) get an exact distance. This is where the quadratic pairwise
//! cost is avoided.

use rayon::prelude::*;
use log::{debug, info};
use crate::distance::Metric;
use crate::error::Result;
use crate::graph::spatial::{build_rtree, find_within_radius};
use crate::graph::DistanceGraph;
use crate::sampling::PivotMatrix;
use crate::utils::parallel::PairEvaluator;

pub struct NeighborGraphBuilder<'a> {
    pivot_matrix: &'a PivotMatrix,
    epsilon: f64,
}

impl<'a> NeighborGraphBuilder<'a> {
    pub fn new(pivot_matrix: &'a PivotMatrix, epsilon: f64) -> Self {
        Self { pivot_matrix, epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Unordered pairs `(i, j)`, `i < j`, within `epsilon` in pivot space.
    /// Each pair appears once, sorted by `(i, j)`.
    pub fn close_pairs(&self, evaluator: &PairEvaluator) -> Vec<(usize, usize)> {
        let rtree = build_rtree(self.pivot_matrix);
        let n = self.pivot_matrix.n_rows();

        let pairs: Vec<(usize, usize)> = evaluator.install(|| {
            (0..n)
                .into_par_iter()
                .flat_map_iter(|i| {
                    find_within_radius(&rtree, self.pivot_matrix, i, self.epsilon)
                        .into_iter()
                        .filter(move |&j| i < j)
                        .map(move |j| (i, j))
                })
                .collect()
        });

        debug!("Radius query with epsilon {:.6} found {} close pairs", self.epsilon, pairs.len());
        pairs
    }

    /// Inserts an exact-distance edge for every close pair. Returns the pairs evaluated.
    pub fn build(
        &self,
        graph: &mut DistanceGraph,
        sequences: &[&[f64]],
        metric: &Metric,
        evaluator: &PairEvaluator,
    ) -> Result<usize> {
        let pairs = self.close_pairs(evaluator);
        let distances = evaluator.evaluate(&pairs, "neighbour distances", |i, j| {
            metric.distance(sequences[i], sequences[j])
        });

        for (&(i, j), distance) in pairs.iter().zip(distances) {
            graph.insert_edge(i, j, distance)?;
        }

        info!("Added {} neighbour edges (graph now has {})", pairs.len(), graph.n_edges());
        Ok(pairs.len())
    }
}
