// src/config/subsystems/clustering.rs

use serde::{Serialize, Deserialize};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use crate::config::{parse_bool, FromIni};
use crate::error::{Error, Result};

/// Linkage criterion used when two clusters are merged.
///
/// Only `Single` and `Complete` follow the exact Lance-Williams update.
/// The remaining methods average the two candidate edge weights, which is a
/// deliberate approximation that keeps each merge local to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    Single,
    Complete,
    Average,
    Weighted,
    Centroid,
    Median,
    Ward,
}

impl Linkage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Weighted => "weighted",
            Linkage::Centroid => "centroid",
            Linkage::Median => "median",
            Linkage::Ward => "ward",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim_matches('"').to_lowercase().as_str() {
            "single" => Some(Self::Single),
            "complete" => Some(Self::Complete),
            "average" => Some(Self::Average),
            "weighted" => Some(Self::Weighted),
            "centroid" => Some(Self::Centroid),
            "median" => Some(Self::Median),
            "ward" => Some(Self::Ward),
            _ => None,
        }
    }

    /// Weight of the edge from a merged cluster to a common neighbour,
    /// given the neighbour's edges to both merged clusters.
    #[inline]
    pub fn combine(&self, distance_a: f64, distance_b: f64) -> f64 {
        match self {
            Linkage::Single => distance_a.min(distance_b),
            Linkage::Complete => distance_a.max(distance_b),
            Linkage::Average
            | Linkage::Weighted
            | Linkage::Centroid
            | Linkage::Median
            | Linkage::Ward => (distance_a + distance_b) / 2.0,
        }
    }
}

impl Default for Linkage {
    fn default() -> Self {
        Self::Single
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub method: Linkage,
    // Only needed to cut the tree into flat labels
    pub n_clusters: Option<usize>,
    pub n_pivots: usize,
    /// Share of the edge budget spent on pivot-space neighbours (the rest is random pairs).
    pub s: f64,
    /// Edge budget as a fraction of all `n(n-1)/2` pairs.
    pub m: f64,
    pub random_state: Option<u64>,
    pub verbose: bool,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            method: Linkage::default(),
            n_clusters: None,
            n_pivots: 20,
            s: 0.5,
            m: 0.1,
            random_state: None,
            verbose: false,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_pivots == 0 {
            return Err(Error::config("Invalid n_pivots (must be > 0)"));
        }
        if !(0.0..=1.0).contains(&self.s) {
            return Err(Error::config(format!("Invalid s (must be between 0 and 1): {}", self.s)));
        }
        if !(self.m > 0.0 && self.m <= 1.0) {
            return Err(Error::config(format!("Invalid m (must be in (0, 1]): {}", self.m)));
        }
        if self.n_clusters == Some(0) {
            return Err(Error::config("Invalid n_clusters (must be > 0)"));
        }
        Ok(())
    }

    /// Fresh generator for one run. Seeded runs are reproducible.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl FromIni for ClusteringConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "clustering" {
            return None;
        }
        let raw = value.trim_matches('"');

        let result = match key {
            "method" | "linkage" => match Linkage::from_str(raw) {
                Some(method) => {
                    self.method = method;
                    Ok(())
                }
                None => Err(Error::config(format!(
                    "Unknown linkage method '{}' (expected one of single, complete, average, weighted, centroid, median, ward)",
                    value
                ))),
            },
            "n_clusters" => match raw.parse::<usize>() {
                Ok(k) if k > 0 => {
                    self.n_clusters = Some(k);
                    Ok(())
                }
                _ => Err(Error::config(format!("Invalid n_clusters (must be > 0): {}", value))),
            },
            "n_pivots" => match raw.parse::<usize>() {
                Ok(k) if k > 0 => {
                    self.n_pivots = k;
                    Ok(())
                }
                _ => Err(Error::config(format!("Invalid n_pivots (must be > 0): {}", value))),
            },
            "s" => match raw.parse::<f64>() {
                Ok(s) if (0.0..=1.0).contains(&s) => {
                    self.s = s;
                    Ok(())
                }
                _ => Err(Error::config(format!("Invalid s (must be between 0 and 1): {}", value))),
            },
            "m" => match raw.parse::<f64>() {
                Ok(m) if m > 0.0 && m <= 1.0 => {
                    self.m = m;
                    Ok(())
                }
                _ => Err(Error::config(format!("Invalid m (must be in (0, 1]): {}", value))),
            },
            "random_state" => match raw.parse::<u64>() {
                Ok(seed) => {
                    self.random_state = Some(seed);
                    Ok(())
                }
                _ => Err(Error::config(format!("Invalid random_state (expected an unsigned integer): {}", value))),
            },
            "verbose" => match parse_bool(raw) {
                Some(verbose) => {
                    self.verbose = verbose;
                    Ok(())
                }
                None => Err(Error::config(format!("Invalid verbose (expected true/false): {}", value))),
            },
            _ => return None,
        };
        Some(result)
    }
}
