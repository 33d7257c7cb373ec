//! Pairwise distance kernels for numeric sequences.
//!
//! Every kernel is a pure function of its two inputs, so a [`Metric`] can be
//! shared freely across worker threads. Lock-step kernels (Euclidean,
//! Lorentzian, Chebyshev) truncate both inputs to the shorter length; the
//! elastic kernels (MSM, KDTW, DTW) and SBD handle unequal lengths natively.

pub mod dtw;
pub mod kdtw;
pub mod lockstep;
pub mod msm;
pub mod sbd;

use serde::{Serialize, Deserialize};

pub use dtw::dtw_distance;
pub use kdtw::{kdtw_distance, KdtwParams};
pub use lockstep::{chebyshev_distance, euclidean_distance, lorentzian_distance};
pub use msm::{msm_distance, DEFAULT_MSM_CONSTANT};
pub use sbd::sbd_distance;

/// A distance kernel together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Metric {
    Euclidean,
    Lorentzian,
    Chebyshev,
    Msm { constant: f64 },
    Kdtw(KdtwParams),
    Sbd,
    Dtw,
}

impl Metric {
    /// Distance between `x` and `y`. Always finite and non-negative for
    /// finite, non-empty inputs.
    pub fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => euclidean_distance(x, y),
            Metric::Lorentzian => lorentzian_distance(x, y),
            Metric::Chebyshev => chebyshev_distance(x, y),
            Metric::Msm { constant } => msm_distance(x, y, *constant),
            Metric::Kdtw(params) => kdtw_distance(x, y, params),
            Metric::Sbd => sbd_distance(x, y),
            Metric::Dtw => dtw_distance(x, y),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Lorentzian => "lorentzian",
            Metric::Chebyshev => "chebyshev",
            Metric::Msm { .. } => "msm",
            Metric::Kdtw(_) => "kdtw",
            Metric::Sbd => "sbd",
            Metric::Dtw => "dtw",
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::Euclidean
    }
}
