//! End-to-end approximate hierarchical clustering.
//!
//! A run embeds every sequence in pivot space, spends part of the edge
//! budget on pairs that look close there and the rest on uniformly random
//! pairs, then merges greedily over the resulting sparse graph. Random draws
//! happen in a fixed order (pivots, epsilon sample, random pairs) from one
//! generator, so a seeded run is fully reproducible.

use std::time::Instant;
use log::{debug, info};
use serde::{Serialize, Deserialize};
use crate::config::HappieConfig;
use crate::error::{Error, Result};
use crate::graph::{AugmentReport, DistanceGraph, NeighborGraphBuilder, RandomEdgeAugmenter};
use crate::linkage::{cut_tree, GraphLinkageEngine, LinkageMatrix};
use crate::sampling::{estimate_epsilon, select_pivots, PivotMatrix};
use crate::utils::parallel::PairEvaluator;

/// How the sparse graph of one run was sampled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingStats {
    pub n_sequences: usize,
    pub pivots: Vec<usize>,
    /// Pivot-space radius used for neighbour search.
    pub epsilon: f64,
    pub neighbor_pairs: usize,
    pub random_drawn: usize,
    pub random_inserted: usize,
    pub random_overwritten: usize,
    /// Edges in the graph handed to the merge engine.
    pub total_edges: usize,
    /// `total_edges` over all `n(n-1)/2` pairs.
    pub sampled_fraction: f64,
}

impl SamplingStats {
    fn record_random(&mut self, report: &AugmentReport) {
        self.random_drawn = report.drawn;
        self.random_inserted = report.inserted;
        self.random_overwritten = report.overwritten;
    }
}

#[derive(Debug, Clone)]
pub struct ClusteringRun {
    pub linkage: LinkageMatrix,
    pub stats: SamplingStats,
}

pub struct HappieClust {
    config: HappieConfig,
}

impl HappieClust {
    pub fn new(config: HappieConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HappieConfig {
        &self.config
    }

    /// Runs the full pipeline and keeps the sampling statistics.
    pub fn fit<S: AsRef<[f64]> + Sync>(&self, sequences: &[S]) -> Result<ClusteringRun> {
        let sequences: Vec<&[f64]> = sequences.iter().map(AsRef::as_ref).collect();
        validate_sequences(&sequences)?;

        let n = sequences.len();
        let mut stats = SamplingStats { n_sequences: n, ..SamplingStats::default() };
        if n == 1 {
            debug!("Single sequence, nothing to merge");
            return Ok(ClusteringRun { linkage: LinkageMatrix::with_capacity(1), stats });
        }

        let start_time = Instant::now();
        let clustering = &self.config.clustering;
        let metric = self.config.metric();
        let evaluator = PairEvaluator::new(&self.config.processor, clustering.verbose)?;
        let mut rng = clustering.rng();

        info!(
            "Clustering {} sequences: metric {}, linkage {}, {} pivots, s = {}, m = {}",
            n, metric.as_str(), clustering.method.as_str(), clustering.n_pivots, clustering.s, clustering.m
        );

        let pivots = select_pivots(n, clustering.n_pivots, &mut rng)?;
        let pivot_matrix = PivotMatrix::compute(&sequences, &pivots, &metric, &evaluator);
        let epsilon = estimate_epsilon(&pivot_matrix, clustering.s, clustering.m, &mut rng, &evaluator);

        let mut graph = DistanceGraph::new(n);
        let neighbor_pairs = NeighborGraphBuilder::new(&pivot_matrix, epsilon)
            .build(&mut graph, &sequences, &metric, &evaluator)?;
        let report = RandomEdgeAugmenter::new(clustering.s, clustering.m)
            .augment(&mut graph, &sequences, &metric, &mut rng, &evaluator)?;

        stats.pivots = pivots;
        stats.epsilon = epsilon;
        stats.neighbor_pairs = neighbor_pairs;
        stats.record_random(&report);
        stats.total_edges = graph.n_edges();
        stats.sampled_fraction = graph.n_edges() as f64 / (n * (n - 1) / 2) as f64;
        debug!(
            "Sampled {} edges ({:.2}% of all pairs): {} neighbour pairs, {} new random edges",
            stats.total_edges,
            stats.sampled_fraction * 100.0,
            stats.neighbor_pairs,
            stats.random_inserted
        );

        let linkage = GraphLinkageEngine::new(clustering.method)
            .with_verbose(clustering.verbose)
            .run(graph)?;

        info!("Clustering finished in {:.2?}", start_time.elapsed());
        Ok(ClusteringRun { linkage, stats })
    }

    /// The merge tree only.
    pub fn linkage<S: AsRef<[f64]> + Sync>(&self, sequences: &[S]) -> Result<LinkageMatrix> {
        self.fit(sequences).map(|run| run.linkage)
    }

    /// Flat labels for the configured `n_clusters`.
    pub fn fit_predict<S: AsRef<[f64]> + Sync>(&self, sequences: &[S]) -> Result<Vec<usize>> {
        let n_clusters = self
            .config
            .clustering
            .n_clusters
            .ok_or_else(|| Error::config("n_clusters must be set to extract flat clusters"))?;
        if n_clusters > sequences.len() {
            return Err(Error::InvalidClusterCount { requested: n_clusters, n_items: sequences.len() });
        }
        let linkage = self.linkage(sequences)?;
        cut_tree(&linkage, n_clusters)
    }
}

fn validate_sequences(sequences: &[&[f64]]) -> Result<()> {
    if sequences.is_empty() {
        return Err(Error::EmptyInput);
    }
    for (index, sequence) in sequences.iter().enumerate() {
        if sequence.is_empty() {
            return Err(Error::EmptySequence { index });
        }
        if sequence.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue { index });
        }
    }
    Ok(())
}
