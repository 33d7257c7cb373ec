//! Sparse distance graph over sequence slots.
//!
//! The graph is an arena of `n` fixed node slots. Slots are never reused or
//! removed: a merged-away node is detached (all of its edges dropped) and
//! flagged inactive. Each edge stores its distance and an insertion stamp
//! taken from a counter that only grows; re-weighting an edge gives it a new
//! stamp. The stamp is what makes tie-breaking between equal distances
//! reproducible.

pub mod neighbors;
pub mod random_edges;
pub mod spatial;

use std::collections::BTreeMap;
use crate::error::{Error, Result};

pub use neighbors::NeighborGraphBuilder;
pub use random_edges::{AugmentReport, RandomEdgeAugmenter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeWeight {
    pub distance: f64,
    pub stamp: u64,
}

#[derive(Debug, Clone)]
pub struct DistanceGraph {
    // Neighbour maps are ordered so iteration never depends on hashing.
    adjacency: Vec<BTreeMap<usize, EdgeWeight>>,
    active: Vec<bool>,
    n_active: usize,
    n_edges: usize,
    next_stamp: u64,
}

impl DistanceGraph {
    /// Graph with `n` active nodes and no edges.
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![BTreeMap::new(); n],
            active: vec![true; n],
            n_active: n,
            n_edges: 0,
            next_stamp: 0,
        }
    }

    /// Number of node slots, active or not.
    pub fn n_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn n_active(&self) -> usize {
        self.n_active
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    pub fn is_active(&self, node: usize) -> bool {
        self.active.get(node).copied().unwrap_or(false)
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, BTreeMap::len)
    }

    pub fn distance(&self, a: usize, b: usize) -> Option<f64> {
        self.weight(a, b).map(|w| w.distance)
    }

    /// Neighbours of `node` in ascending id order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|map| map.iter().map(|(&x, w)| (x, w.distance)))
    }

    /// Every edge once, as `(a, b, distance)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.stamped_edges().map(|(a, b, w)| (a, b, w.distance))
    }

    /// Inserts the edge `{a, b}` or overwrites its distance.
    ///
    /// Returns `true` when the edge did not exist before.
    pub fn insert_edge(&mut self, a: usize, b: usize, distance: f64) -> Result<bool> {
        self.insert_stamped(a, b, distance).map(|(is_new, _)| is_new)
    }

    pub fn remove_edge(&mut self, a: usize, b: usize) -> Option<f64> {
        let removed = self.adjacency.get_mut(a)?.remove(&b)?;
        if let Some(map) = self.adjacency.get_mut(b) {
            map.remove(&a);
        }
        self.n_edges -= 1;
        Some(removed.distance)
    }

    pub(crate) fn weight(&self, a: usize, b: usize) -> Option<EdgeWeight> {
        self.adjacency.get(a)?.get(&b).copied()
    }

    pub(crate) fn stamped_edges(&self) -> impl Iterator<Item = (usize, usize, EdgeWeight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, map)| {
            map.range(a + 1..).map(move |(&b, &w)| (a, b, w))
        })
    }

    pub(crate) fn insert_stamped(&mut self, a: usize, b: usize, distance: f64) -> Result<(bool, u64)> {
        if a == b {
            return Err(Error::SelfLoop { node: a });
        }
        for node in [a, b] {
            if !self.is_active(node) {
                return Err(Error::UnknownNode { node });
            }
        }
        if !distance.is_finite() {
            return Err(Error::NonFiniteDistance { a, b });
        }
        if distance < 0.0 {
            return Err(Error::NegativeDistance { a, b, distance });
        }

        let weight = EdgeWeight { distance, stamp: self.next_stamp };
        self.next_stamp += 1;

        let is_new = self.adjacency[a].insert(b, weight).is_none();
        self.adjacency[b].insert(a, weight);
        if is_new {
            self.n_edges += 1;
        }
        Ok((is_new, weight.stamp))
    }

    /// Drops every edge of `node`, marks it inactive and returns its former
    /// neighbour map.
    pub(crate) fn detach(&mut self, node: usize) -> BTreeMap<usize, EdgeWeight> {
        if !self.is_active(node) {
            return BTreeMap::new();
        }
        let neighbors = std::mem::take(&mut self.adjacency[node]);
        for x in neighbors.keys() {
            self.adjacency[*x].remove(&node);
        }
        self.n_edges -= neighbors.len();
        self.active[node] = false;
        self.n_active -= 1;
        neighbors
    }
}
