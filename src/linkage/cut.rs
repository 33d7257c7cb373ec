//! Cutting a merge tree into flat clusters.

use crate::error::{Error, Result};
use crate::linkage::LinkageMatrix;

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Flat cluster labels, one per leaf, for exactly `n_clusters` clusters.
///
/// Replays the first `n - n_clusters` merges in merge order (not distance
/// order) and numbers the resulting components by first appearance over
/// leaves `0..n`, so leaf 0 always gets label 0.
pub fn cut_tree(linkage: &LinkageMatrix, n_clusters: usize) -> Result<Vec<usize>> {
    let n = linkage.n_leaves();
    if n_clusters == 0 || n_clusters > n {
        return Err(Error::InvalidClusterCount { requested: n_clusters, n_items: n });
    }

    let merges = n - n_clusters;
    if merges > linkage.len() {
        return Err(Error::invalid_linkage(format!(
            "{} merges needed for {} clusters, only {} recorded", merges, n_clusters, linkage.len()
        )));
    }

    // parent: union-find over leaves; leaf_of: any leaf of each cluster id.
    let mut parent: Vec<usize> = (0..n).collect();
    let mut leaf_of: Vec<usize> = (0..n).collect();

    for (step, row) in linkage.rows().iter().take(merges).enumerate() {
        let next_id = n + step;
        if row.cluster_a >= next_id || row.cluster_b >= next_id {
            return Err(Error::invalid_linkage(format!(
                "row {} references a cluster that does not exist yet", step
            )));
        }
        let root_a = find(&mut parent, leaf_of[row.cluster_a]);
        let root_b = find(&mut parent, leaf_of[row.cluster_b]);
        if root_a == root_b {
            return Err(Error::invalid_linkage(format!(
                "row {} merges two clusters that are already joined", step
            )));
        }
        parent[root_b] = root_a;
        leaf_of.push(root_a);
    }

    let mut label_of_root = vec![usize::MAX; n];
    let mut next_label = 0;
    let labels = (0..n)
        .map(|leaf| {
            let root = find(&mut parent, leaf);
            if label_of_root[root] == usize::MAX {
                label_of_root[root] = next_label;
                next_label += 1;
            }
            label_of_root[root]
        })
        .collect();
    Ok(labels)
}
