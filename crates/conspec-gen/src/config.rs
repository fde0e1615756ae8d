//! # Generator Configuration
//!
//! Knobs for the randomness source and the refinement retry ceiling. Every
//! field has a default, so a partial JSON document deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Default ceiling on rejection-sampling attempts per drawn element.
pub const DEFAULT_MAX_FILTER_ATTEMPTS: u32 = 100;

/// Settings for generator compilation and drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the stream. `None` picks a fresh random seed per stream.
    pub seed: Option<u64>,
    /// Candidates a refinement may reject in a row before generation fails.
    pub max_filter_attempts: u32,
    /// Upper bound on generated string length.
    pub max_string_len: usize,
    /// Smallest integer the base integer generator emits.
    pub integer_min: i64,
    /// Largest integer the base integer generator emits.
    pub integer_max: i64,
    /// Lower bound of the base float generator.
    pub float_min: f64,
    /// Upper bound of the base float generator.
    pub float_max: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_filter_attempts: DEFAULT_MAX_FILTER_ATTEMPTS,
            max_string_len: 32,
            integer_min: -1_000,
            integer_max: 1_000,
            float_min: -1_000.0,
            float_max: 1_000.0,
        }
    }
}

impl GeneratorConfig {
    /// Default settings with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
