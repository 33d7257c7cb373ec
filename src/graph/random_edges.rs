//! Uniformly random edges on top of the neighbour graph.
//!
//! Random pairs keep the graph connected when pivot-space neighbourhoods
//! form isolated islands, and they contribute distances that do not depend
//! on where the pivots happen to lie.

use ahash::AHashSet;
use rand::Rng;
use log::{debug, info};
use crate::distance::Metric;
use crate::error::Result;
use crate::graph::DistanceGraph;
use crate::sampling::random_pairs;
use crate::utils::parallel::PairEvaluator;

/// What one augmentation pass did to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AugmentReport {
    /// Pairs drawn, self pairs included.
    pub drawn: usize,
    /// Distinct non-self pairs whose distance was computed.
    pub evaluated: usize,
    /// Edges that did not exist before.
    pub inserted: usize,
    /// Edges that already existed and were overwritten.
    pub overwritten: usize,
}

pub struct RandomEdgeAugmenter {
    s: f64,
    m: f64,
}

impl RandomEdgeAugmenter {
    pub fn new(s: f64, m: f64) -> Self {
        Self { s, m }
    }

    /// Total edge budget: `floor(m * n(n-1)/2)`.
    pub fn edge_budget(&self, n: usize) -> usize {
        let all_pairs = n * n.saturating_sub(1) / 2;
        (self.m * all_pairs as f64) as usize
    }

    /// Number of random pairs to draw: `floor((1 - s) * budget)`.
    pub fn random_draws(&self, n: usize) -> usize {
        ((1.0 - self.s) * self.edge_budget(n) as f64) as usize
    }

    pub fn augment<R: Rng + ?Sized>(
        &self,
        graph: &mut DistanceGraph,
        sequences: &[&[f64]],
        metric: &Metric,
        rng: &mut R,
        evaluator: &PairEvaluator,
    ) -> Result<AugmentReport> {
        let n = sequences.len();
        let drawn = self.random_draws(n);
        if n < 2 || drawn == 0 {
            debug!("No random edges requested (n = {}, s = {}, m = {})", n, self.s, self.m);
            return Ok(AugmentReport { drawn, ..AugmentReport::default() });
        }

        let mut seen = AHashSet::with_capacity(drawn);
        let pairs: Vec<(usize, usize)> = random_pairs(n, drawn, rng)
            .into_iter()
            .map(|(i, j)| (i.min(j), i.max(j)))
            .filter(|pair| seen.insert(*pair))
            .collect();

        let distances = evaluator.evaluate(&pairs, "random pair distances", |i, j| {
            metric.distance(sequences[i], sequences[j])
        });

        let mut report = AugmentReport {
            drawn,
            evaluated: pairs.len(),
            ..AugmentReport::default()
        };
        for (&(i, j), distance) in pairs.iter().zip(distances) {
            if graph.insert_edge(i, j, distance)? {
                report.inserted += 1;
            } else {
                report.overwritten += 1;
            }
        }

        info!(
            "Added {} random edges ({} drawn, {} overwritten; graph now has {})",
            report.inserted, report.drawn, report.overwritten, graph.n_edges()
        );
        Ok(report)
    }
}
