pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use crate::distance::Metric;
use crate::error::{Error, Result};
use log::{debug, warn, trace};

pub use subsystems::{ClusteringConfig, DistanceConfig, Linkage, MetricKind, ProcessorConfig};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

/// Every knob of a clustering run.
///
/// Loaded from an INI file with `[distance]`, `[clustering]` and
/// `[processor]` sections, or assembled in code with the `with_*` setters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HappieConfig {
    pub distance: DistanceConfig,
    pub clustering: ClusteringConfig,
    pub processor: ProcessorConfig,
}

impl HappieConfig {
    pub fn validate(&self) -> Result<()> {
        self.distance.validate()?;
        self.clustering.validate()?;
        self.processor.validate()?;
        Ok(())
    }

    /// The sequence metric, with its kernel parameters.
    pub fn metric(&self) -> Metric {
        self.distance.metric()
    }

    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.distance.metric = metric;
        self
    }

    pub fn with_method(mut self, method: Linkage) -> Self {
        self.clustering.method = method;
        self
    }

    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.clustering.n_clusters = Some(n_clusters);
        self
    }

    pub fn with_n_pivots(mut self, n_pivots: usize) -> Self {
        self.clustering.n_pivots = n_pivots;
        self
    }

    pub fn with_s(mut self, s: f64) -> Self {
        self.clustering.s = s;
        self
    }

    pub fn with_m(mut self, m: f64) -> Self {
        self.clustering.m = m;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.clustering.random_state = Some(seed);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.clustering.verbose = verbose;
        self
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.processor.n_jobs = n_jobs;
        self
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        let absolute_path = fs::canonicalize(&path)
            .unwrap_or_else(|_| path.as_ref().to_path_buf());

        trace!("Loading configuration from: {:?}", absolute_path);

        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("Ignoring malformed config line {}: {}", line_num + 1, line);
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Delegate to appropriate subsystem config
            let handled = match current_section.as_str() {
                "distance" => config.distance.from_ini_section(&current_section, key, value),
                "clustering" => config.clustering.from_ini_section(&current_section, key, value),
                "processor" => config.processor.from_ini_section(&current_section, key, value),
                _ => None,
            };

            match handled {
                Some(Err(e)) => {
                    return Err(Error::config(format!(
                        "line {}: {} ({}={})", line_num + 1, e, key, value
                    )));
                }
                Some(Ok(())) => {}
                None => warn!("Unrecognized config key: {}={} in section [{}]", key, value, current_section),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim_matches('"').to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
