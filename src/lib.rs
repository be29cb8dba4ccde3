//! Conjectures is a library of generators for property testing. Values are
//! produced from an immutable, splittable random source, and each one comes
//! with a lazily computed tree of simpler values to try when a test fails.
//!
//! The [`generators`](generators/index.html) module describes how values
//! get produced, and the [`data`](data/index.html) module holds the random
//! source and shrink tree they are built on. For poking at a generator by
//! hand, use [`generate`](fn.generate.html) or [`sample`](fn.sample.html):
//!
//! ```
//! use conjectures::generators::*;
//! use conjectures::*;
//!
//! let pairs = sample(&(choose(0, 10), choose(-10, 0))).expect("pairs");
//! assert_eq!(pairs.len(), 10);
//! for (a, b) in pairs {
//!     assert!(a >= 0 && b <= 0);
//! }
//! ```

#[macro_use]
extern crate log;

pub mod data;
pub mod generators;

use crate::data::*;
use crate::generators::*;

const DEFAULT_SIZE: usize = 30;
const DEFAULT_MAX_SIZE: usize = 200;
const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Configuration for drawing values outside of a shrink search: the size to
/// generate at, the size cycle used when sampling, and an optional seed.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    size: usize,
    max_size: usize,
    seed: Option<i64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        SampleConfig {
            size: DEFAULT_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            seed: None,
        }
    }
}

impl SampleConfig {
    /// Overrides the size used by [`generate`](#method.generate).
    pub fn size(&self, size: usize) -> Self {
        SampleConfig {
            size,
            ..self.clone()
        }
    }

    /// Overrides the (exclusive) bound that sample sizes cycle up to.
    ///
    /// # Panics
    ///
    /// If `max_size` is zero.
    pub fn max_size(&self, max_size: usize) -> Self {
        assert!(max_size > 0, "max_size must be positive");
        SampleConfig {
            max_size,
            ..self.clone()
        }
    }

    /// Uses a fixed seed, rather than one drawn from the process-wide
    /// source.
    pub fn seed(&self, seed: i64) -> Self {
        SampleConfig {
            seed: Some(seed),
            ..self.clone()
        }
    }

    fn source(&self) -> RandomSource {
        match self.seed {
            Some(seed) => RandomSource::make(seed),
            None => RandomSource::auto(),
        }
    }

    /// Evaluates `gen` once, returning only the root value.
    pub fn generate<G: Generator>(&self, gen: G) -> Maybe<G::Item> {
        Ok(gen.generate(self.source(), self.size)?.into_value())
    }

    /// An endless stream of values from `gen`, at sizes cycling from zero up
    /// to `max_size`.
    pub fn sample_iter<G: Generator>(&self, gen: G) -> SampleIter<G> {
        SampleIter {
            gen,
            src: self.source(),
            size: 0,
            max_size: self.max_size,
        }
    }

    /// The first `count` values of [`sample_iter`](#method.sample_iter).
    pub fn sample<G: Generator>(&self, gen: G, count: usize) -> Maybe<Vec<G::Item>> {
        self.sample_iter(gen).take(count).collect()
    }
}

/// See [`SampleConfig::sample_iter`](struct.SampleConfig.html#method.sample_iter)
#[derive(Debug, Clone)]
pub struct SampleIter<G> {
    gen: G,
    src: RandomSource,
    size: usize,
    max_size: usize,
}

impl<G: Generator> Iterator for SampleIter<G> {
    type Item = Maybe<G::Item>;
    fn next(&mut self) -> Option<Self::Item> {
        let (now, later) = self.src.split();
        let size = self.size;
        self.src = later;
        self.size = (size + 1) % self.max_size;
        trace!("sampling at size {}", size);
        Some(self.gen.generate(now, size).map(|tree| tree.into_value()))
    }
}

/// Evaluates `gen` once with the default configuration, returning only the
/// root value.
pub fn generate<G: Generator>(gen: G) -> Maybe<G::Item> {
    SampleConfig::default().generate(gen)
}

/// Draws ten values from `gen` with the default configuration. Useful when
/// debugging a generator.
pub fn sample<G: Generator>(gen: G) -> Maybe<Vec<G::Item>> {
    SampleConfig::default().sample(gen, DEFAULT_SAMPLE_COUNT)
}
