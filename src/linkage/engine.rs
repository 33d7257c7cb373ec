//! Greedy agglomerative merging over a sparse distance graph.
//!
//! Each step merges the endpoints of the globally shortest remaining edge.
//! The endpoint with fewer neighbours is absorbed into the other one: its
//! edges are folded into the survivor with [`Linkage::combine`], so a merge
//! only touches the absorbed node's neighbourhood.
//!
//! The shortest edge comes from a binary min-heap with lazy invalidation:
//! every edge insertion pushes a candidate carrying the edge's stamp, and a
//! popped candidate is only used while the graph still holds that exact
//! stamp. Ties on distance go to the earlier stamp.
//!
//! With all pairs present, `Single` and `Complete` reproduce exact HAC. The
//! averaging methods are an approximation (see [`Linkage`]).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;
use log::{debug, info, trace};
use crate::config::Linkage;
use crate::error::{Error, Result};
use crate::graph::DistanceGraph;
use crate::linkage::{LinkageMatrix, LinkageRow};
use crate::utils::parallel::progress_bar;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    stamp: u64,
    a: usize,
    b: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.stamp.cmp(&other.stamp))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

#[derive(Debug, Clone)]
pub struct GraphLinkageEngine {
    method: Linkage,
    verbose: bool,
}

impl GraphLinkageEngine {
    pub fn new(method: Linkage) -> Self {
        Self { method, verbose: false }
    }

    /// Show a progress bar over the merges.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the graph and merges until one node is left.
    ///
    /// Fails with [`Error::InsufficientEdges`] when the edges run out first;
    /// a partial tree is never returned.
    pub fn run(&self, mut graph: DistanceGraph) -> Result<LinkageMatrix> {
        let n = graph.n_nodes();
        if graph.n_active() != n {
            return Err(Error::config("linkage needs a graph with every node still active"));
        }

        let mut linkage = LinkageMatrix::with_capacity(n);
        if n < 2 {
            return Ok(linkage);
        }

        let start_time = Instant::now();
        let expected = n - 1;
        debug!("Merging {} nodes over {} edges with {} linkage", n, graph.n_edges(), self.method.as_str());

        let mut sizes = vec![1usize; n];
        let mut labels: Vec<usize> = (0..n).collect();
        let mut heap: BinaryHeap<Reverse<Candidate>> = graph
            .stamped_edges()
            .map(|(a, b, w)| Reverse(Candidate { distance: w.distance, stamp: w.stamp, a, b }))
            .collect();

        let progress = progress_bar(expected as u64, "merging", self.verbose);

        for step in 0..expected {
            let candidate = loop {
                match heap.pop() {
                    Some(Reverse(c)) => {
                        if graph.weight(c.a, c.b).map(|w| w.stamp) == Some(c.stamp) {
                            break c;
                        }
                    }
                    None => {
                        progress.abandon();
                        return Err(Error::InsufficientEdges { merged: step, expected });
                    }
                }
            };

            let (mut u, mut v) = (candidate.a, candidate.b);
            let size = sizes[u] + sizes[v];
            let row = LinkageRow {
                cluster_a: labels[u].min(labels[v]),
                cluster_b: labels[u].max(labels[v]),
                distance: candidate.distance,
                size,
            };
            trace!("Merge {}: {} + {} at {:.6} (size {})", step, row.cluster_a, row.cluster_b, row.distance, size);
            linkage.push(row);

            // Absorb the node with fewer neighbours.
            if graph.degree(u) > graph.degree(v) {
                std::mem::swap(&mut u, &mut v);
            }

            for (x, absorbed) in graph.detach(u) {
                if x == v {
                    continue;
                }
                let distance = match graph.distance(v, x) {
                    Some(existing) => self.method.combine(absorbed.distance, existing),
                    None => absorbed.distance,
                };
                let (_, stamp) = graph.insert_stamped(v, x, distance)?;
                heap.push(Reverse(Candidate { distance, stamp, a: v.min(x), b: v.max(x) }));
            }

            sizes[v] = size;
            labels[v] = n + step;
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!("Built linkage with {} merges in {:.2?}", linkage.len(), start_time.elapsed());
        Ok(linkage)
    }
}
