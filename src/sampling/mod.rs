//! Randomized sampling stages that decide which pairs get an exact distance.
//!
//! Every function here takes the run's generator explicitly, so a seeded
//! run draws the same pivots, epsilon sample and random pairs every time.

pub mod epsilon;
pub mod pivots;

pub use epsilon::{estimate_epsilon, quantile, random_pairs};
pub use pivots::{select_pivots, PivotMatrix};
