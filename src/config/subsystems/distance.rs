// src/config/subsystems/distance.rs

use serde::{Serialize, Deserialize};
use crate::config::{parse_bool, FromIni};
use crate::distance::{KdtwParams, Metric, DEFAULT_MSM_CONSTANT};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Euclidean,
    Lorentzian,
    Chebyshev,
    Msm,
    Kdtw,
    Sbd,
    Dtw,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Euclidean => "euclidean",
            MetricKind::Lorentzian => "lorentzian",
            MetricKind::Chebyshev => "chebyshev",
            MetricKind::Msm => "msm",
            MetricKind::Kdtw => "kdtw",
            MetricKind::Sbd => "sbd",
            MetricKind::Dtw => "dtw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim_matches('"').to_lowercase().as_str() {
            "euclidean" => Some(Self::Euclidean),
            "lorentzian" => Some(Self::Lorentzian),
            "chebyshev" => Some(Self::Chebyshev),
            "msm" => Some(Self::Msm),
            "kdtw" => Some(Self::Kdtw),
            "sbd" => Some(Self::Sbd),
            "dtw" => Some(Self::Dtw),
            _ => None,
        }
    }
}

impl Default for MetricKind {
    fn default() -> Self {
        Self::Euclidean
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConfig {
    pub metric: MetricKind,
    // MSM split/merge cost
    pub msm_constant: f64,
    pub kdtw: KdtwParams,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            metric: MetricKind::default(),
            msm_constant: DEFAULT_MSM_CONSTANT,
            kdtw: KdtwParams::default(),
        }
    }
}

impl DistanceConfig {
    pub fn metric(&self) -> Metric {
        match self.metric {
            MetricKind::Euclidean => Metric::Euclidean,
            MetricKind::Lorentzian => Metric::Lorentzian,
            MetricKind::Chebyshev => Metric::Chebyshev,
            MetricKind::Msm => Metric::Msm { constant: self.msm_constant },
            MetricKind::Kdtw => Metric::Kdtw(self.kdtw),
            MetricKind::Sbd => Metric::Sbd,
            MetricKind::Dtw => Metric::Dtw,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.msm_constant.is_finite() || self.msm_constant < 0.0 {
            return Err(Error::config(format!(
                "Invalid msm_constant (must be finite and >= 0): {}", self.msm_constant
            )));
        }
        if !self.kdtw.gamma.is_finite() || self.kdtw.gamma <= 0.0 {
            return Err(Error::config(format!(
                "Invalid kdtw_gamma (must be > 0): {}", self.kdtw.gamma
            )));
        }
        if !self.kdtw.epsilon.is_finite() || self.kdtw.epsilon < 0.0 {
            return Err(Error::config(format!(
                "Invalid kdtw_epsilon (must be >= 0): {}", self.kdtw.epsilon
            )));
        }
        Ok(())
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64> {
    value.trim_matches('"').parse::<f64>()
        .map_err(|_| Error::config(format!("Invalid {} (expected a number): {}", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    parse_bool(value)
        .ok_or_else(|| Error::config(format!("Invalid {} (expected true/false): {}", key, value)))
}

impl FromIni for DistanceConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "distance" {
            return None;
        }

        let result = match key {
            "metric" => match MetricKind::from_str(value) {
                Some(metric) => {
                    self.metric = metric;
                    Ok(())
                }
                None => Err(Error::config(format!(
                    "Unknown metric '{}' (expected one of euclidean, lorentzian, chebyshev, msm, kdtw, sbd, dtw)",
                    value
                ))),
            },
            "msm_constant" => parse_f64(key, value).map(|v| self.msm_constant = v),
            "kdtw_gamma" => parse_f64(key, value).map(|v| self.kdtw.gamma = v),
            "kdtw_epsilon" => parse_f64(key, value).map(|v| self.kdtw.epsilon = v),
            "kdtw_normalize_input" => parse_flag(key, value).map(|v| self.kdtw.normalize_input = v),
            "kdtw_normalize_distance" => parse_flag(key, value).map(|v| self.kdtw.normalize_distance = v),
            _ => return None,
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for kind in [
            MetricKind::Euclidean,
            MetricKind::Lorentzian,
            MetricKind::Chebyshev,
            MetricKind::Msm,
            MetricKind::Kdtw,
            MetricKind::Sbd,
            MetricKind::Dtw,
        ] {
            assert_eq!(MetricKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MetricKind::from_str("\"KDTW\""), Some(MetricKind::Kdtw));
        assert_eq!(MetricKind::from_str("cosine"), None);
    }

    #[test]
    fn test_kdtw_parameters_flow_into_metric() {
        let mut config = DistanceConfig::default();
        config.from_ini_section("distance", "metric", "kdtw").unwrap().unwrap();
        config.from_ini_section("distance", "kdtw_gamma", "0.5").unwrap().unwrap();
        config.from_ini_section("distance", "kdtw_normalize_input", "false").unwrap().unwrap();

        match config.metric() {
            Metric::Kdtw(params) => {
                assert_eq!(params.gamma, 0.5);
                assert!(!params.normalize_input);
                assert!(params.normalize_distance);
            }
            other => panic!("unexpected metric {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values() {
        let mut config = DistanceConfig::default();
        assert!(config.from_ini_section("distance", "msm_constant", "abc").unwrap().is_err());
        assert!(config.from_ini_section("distance", "unknown_key", "1").is_none());
        assert!(config.from_ini_section("clustering", "metric", "msm").is_none());

        config.kdtw.gamma = 0.0;
        assert!(config.validate().is_err());
    }
}
