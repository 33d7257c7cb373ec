//! Linkage matrices: the merge history of an agglomerative clustering.
//!
//! Leaves are `0..n`; the merge recorded in row `t` creates cluster
//! `n + t`, SciPy/MATLAB style. Rows are kept in merge order. Because the
//! tree comes from a sampled graph, merge distances are not guaranteed to be
//! monotonic.

pub mod cut;
pub mod engine;

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};

pub use cut::cut_tree;
pub use engine::GraphLinkageEngine;

/// A single merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkageRow {
    /// Smaller id of the two merged clusters.
    pub cluster_a: usize,
    /// Larger id of the two merged clusters.
    pub cluster_b: usize,
    /// Distance at which the merge occurred.
    pub distance: f64,
    /// Leaves under the new cluster.
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkageMatrix {
    rows: Vec<LinkageRow>,
    n_leaves: usize,
}

impl LinkageMatrix {
    pub(crate) fn with_capacity(n_leaves: usize) -> Self {
        Self {
            rows: Vec::with_capacity(n_leaves.saturating_sub(1)),
            n_leaves,
        }
    }

    pub(crate) fn push(&mut self, row: LinkageRow) {
        self.rows.push(row);
    }

    /// Builds a matrix from existing rows after checking its structure.
    pub fn from_rows(n_leaves: usize, rows: Vec<LinkageRow>) -> Result<Self> {
        let matrix = Self { rows, n_leaves };
        matrix.validate()?;
        Ok(matrix)
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[LinkageRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkageRow> {
        self.rows.iter()
    }

    /// Merge distances in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.distance).collect()
    }

    /// The 4-column numeric table `[cluster_a, cluster_b, distance, size]`
    /// expected by dendrogram consumers.
    pub fn to_array(&self) -> Vec<[f64; 4]> {
        self.rows
            .iter()
            .map(|r| [r.cluster_a as f64, r.cluster_b as f64, r.distance, r.size as f64])
            .collect()
    }

    /// Flat labels for `n_clusters` clusters. See [`cut_tree`].
    pub fn cut(&self, n_clusters: usize) -> Result<Vec<usize>> {
        cut_tree(self, n_clusters)
    }

    /// Checks that the rows form one complete binary merge tree.
    ///
    /// Every child must be a leaf or a cluster created by an earlier row,
    /// no cluster may be merged twice, sizes must add up and the final
    /// cluster must hold every leaf.
    pub fn validate(&self) -> Result<()> {
        let n = self.n_leaves;
        if self.rows.len() != n.saturating_sub(1) {
            return Err(Error::invalid_linkage(format!(
                "expected {} rows for {} leaves, found {}",
                n.saturating_sub(1), n, self.rows.len()
            )));
        }

        let mut sizes: Vec<usize> = vec![1; n];
        let mut consumed = vec![false; 2 * n];
        for (step, row) in self.rows.iter().enumerate() {
            let next_id = n + step;
            for child in [row.cluster_a, row.cluster_b] {
                if child >= next_id {
                    return Err(Error::invalid_linkage(format!(
                        "row {} references cluster {} before it exists", step, child
                    )));
                }
                if consumed[child] {
                    return Err(Error::invalid_linkage(format!(
                        "row {} merges cluster {} a second time", step, child
                    )));
                }
                consumed[child] = true;
            }
            if row.cluster_a == row.cluster_b {
                return Err(Error::invalid_linkage(format!("row {} merges cluster {} with itself", step, row.cluster_a)));
            }
            let expected = sizes[row.cluster_a] + sizes[row.cluster_b];
            if row.size != expected {
                return Err(Error::invalid_linkage(format!(
                    "row {} has size {}, children add up to {}", step, row.size, expected
                )));
            }
            sizes.push(expected);
        }
        Ok(())
    }
}
