use rand_core::{impls, Error, RngCore, SeedableRng};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;
// Gammas with fewer transitions than this between adjacent bits get spread.
const MIN_GAMMA_TRANSITIONS: u32 = 24;
const GAMMA_SPREAD: u64 = 0xaaaa_aaaa_aaaa_aaaa;

/// Something that can act as a splittable source of randomness.
///
/// Every operation is a pure function of `self`. Calling two different
/// operations on the same value does not give independent results; use
/// [`split`](#tymethod.split) to obtain independent sources.
pub trait SplittableRandom: Sized {
    /// A uniformly distributed 64-bit integer.
    fn rand_long(&self) -> i64;

    /// A uniformly distributed double in `[0.0, 1.0)`.
    fn rand_double(&self) -> f64;

    /// Two new sources, independent of each other and of `self`.
    fn split(&self) -> (Self, Self);

    /// `n` independent sources. Equivalent to splitting `n - 1` times,
    /// always descending into the first half and collecting the second
    /// halves, followed by the final first half.
    fn split_n(&self, n: usize) -> Vec<Self>;
}

/// An immutable, splittable pseudo-random value (the SplitMix64 algorithm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RandomSource {
    gamma: u64,
    state: u64,
}

#[inline]
fn xor_shift(z: u64, n: u32) -> u64 {
    z ^ (z >> n)
}

/// The output avalanche function.
#[inline]
pub(crate) fn mix64(z: u64) -> u64 {
    let z = xor_shift(z, 30).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    let z = xor_shift(z, 27).wrapping_mul(0x94d0_49bb_1331_11eb);
    xor_shift(z, 31)
}

/// Derives a new gamma: always odd, with enough bit transitions to keep
/// successive states well spread.
#[inline]
pub(crate) fn mix_gamma(z: u64) -> u64 {
    let z = xor_shift(z, 33).wrapping_mul(0xff51_afd7_ed55_8ccd);
    let z = xor_shift(z, 33).wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    let z = xor_shift(z, 33) | 1;
    if xor_shift(z, 1).count_ones() < MIN_GAMMA_TRANSITIONS {
        z ^ GAMMA_SPREAD
    } else {
        z
    }
}

static AUTO_SEED: Mutex<Option<RandomSource>> = Mutex::new(None);

impl RandomSource {
    /// Creates a source from an explicit seed.
    pub fn make(seed: i64) -> Self {
        RandomSource {
            gamma: GOLDEN_GAMMA,
            state: seed as u64,
        }
    }

    /// Creates a source without an explicit seed.
    ///
    /// A process-wide source, seeded from the wall clock on first use, is
    /// split under a lock on every call; we hand out one half and keep the
    /// other. Concurrent callers therefore always get distinct sources.
    pub fn auto() -> Self {
        // The stored source is always valid, so a poisoned lock is harmless.
        let mut guard = AUTO_SEED.lock().unwrap_or_else(|e| e.into_inner());
        let current = *guard.get_or_insert_with(|| {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or(0);
            debug!("Seeding process-wide source from clock: {}", millis);
            RandomSource::make(millis)
        });
        let (retained, returned) = current.split();
        *guard = Some(retained);
        returned
    }

    #[cfg(test)]
    pub(crate) fn raw_parts(&self) -> (u64, u64) {
        (self.gamma, self.state)
    }

    fn with_parts(gamma: u64, state: u64) -> Self {
        RandomSource { gamma, state }
    }
}

impl SplittableRandom for RandomSource {
    fn rand_long(&self) -> i64 {
        mix64(self.state.wrapping_add(self.gamma)) as i64
    }

    fn rand_double(&self) -> f64 {
        ((self.rand_long() as u64) >> 11) as f64 * DOUBLE_UNIT
    }

    fn split(&self) -> (Self, Self) {
        let state1 = self.state.wrapping_add(self.gamma);
        let state2 = state1.wrapping_add(self.gamma);
        (
            RandomSource::with_parts(self.gamma, state2),
            RandomSource::with_parts(mix_gamma(state2), mix64(state1)),
        )
    }

    fn split_n(&self, n: usize) -> Vec<Self> {
        match n {
            0 => Vec::new(),
            1 => vec![*self],
            n => {
                let mut out = Vec::with_capacity(n);
                let mut state = self.state;
                for _ in 1..n {
                    let state1 = state.wrapping_add(self.gamma);
                    let state2 = state1.wrapping_add(self.gamma);
                    out.push(RandomSource::with_parts(mix_gamma(state2), mix64(state1)));
                    state = state2;
                }
                out.push(RandomSource::with_parts(self.gamma, state));
                trace!("split_n({}) from {:?}", n, self);
                out
            }
        }
    }
}

/// Adapts a `RandomSource` into a mutable `rand_core` stream, by splitting
/// once per draw.
#[derive(Debug, Clone)]
pub struct SourceRng {
    src: RandomSource,
}

impl SourceRng {
    /// Creates a stream starting from `src`.
    pub fn new(src: RandomSource) -> Self {
        SourceRng { src }
    }

    /// The source the next draw will come from.
    pub fn source(&self) -> RandomSource {
        self.src
    }
}

impl From<RandomSource> for SourceRng {
    fn from(src: RandomSource) -> Self {
        SourceRng::new(src)
    }
}

impl RngCore for SourceRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let (next, out) = self.src.split();
        self.src = next;
        out.rand_long() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SourceRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        SourceRng::new(RandomSource::make(i64::from_le_bytes(seed)))
    }
}
