//! # Value Streams
//!
//! A [`ValueStream`] is the lazy, effectively infinite sequence of values
//! drawn from a compiled [`Generator`]. Streams are seeded: [`restart`]
//! rewinds to the seed and replays the same prefix, and a clone continues
//! independently from the same point.
//!
//! [`restart`]: ValueStream::restart

use std::sync::Arc;

use conspec_core::Value;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::generator::Generator;

/// Restartable stream of generated values.
///
/// Each item is `Ok(value)`, or `Err` if a refinement filter was exhausted
/// while drawing that element.
#[derive(Debug, Clone)]
pub struct ValueStream {
    generator: Arc<Generator>,
    config: GeneratorConfig,
    seed: u64,
    rng: StdRng,
}

impl ValueStream {
    pub fn new(generator: Generator, config: GeneratorConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            generator: Arc::new(generator),
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this stream replays from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Rewind to the first element.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Draw the next `n` values.
    ///
    /// # Errors
    ///
    /// Stops at the first element whose refinement filter was exhausted.
    pub fn take_values(&mut self, n: usize) -> Result<Vec<Value>, GeneratorError> {
        self.by_ref().take(n).collect()
    }
}

impl Iterator for ValueStream {
    type Item = Result<Value, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.draw(&mut self.rng, &self.config))
    }
}
