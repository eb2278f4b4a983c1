/// Uniform selection over phrase lists, behind an injectable random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed values in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` RNG into a `RandomSource`.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng>(pub R);

impl RngSource<StdRng> {
    /// Reproducible source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Values outside `[0, 1)` are clamped into range when read.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Pick one item with probability `1 / items.len()`.
///
/// Panics on an empty slice. `Lexicon` construction rejects empty lists, so
/// this only fires on a broken invariant.
pub fn pick<'a, T, S>(items: &'a [T], source: &mut S) -> &'a T
where
    S: RandomSource + ?Sized,
{
    assert!(!items.is_empty(), "cannot sample from an empty list");
    &items[index_for(source.next_unit(), items.len())]
}

/// Map a unit value onto `0..len`.
pub fn index_for(unit: f64, len: usize) -> usize {
    ((unit * len as f64) as usize).min(len.saturating_sub(1))
}

/// Uniform value in `[low, high)`.
pub fn range<S: RandomSource + ?Sized>(source: &mut S, low: f64, high: f64) -> f64 {
    low + source.next_unit() * (high - low)
}
