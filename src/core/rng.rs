//! Randomness behind a single swappable interface.
//!
//! Every random decision the AI makes (move noise, mistakes on
//! non-critical picks, easy-tier random targets) draws from a
//! `RandomSource`. Production code uses the seeded `GameRng`; tests can
//! pass a `ScriptedRandom` to force or forbid specific rolls.
//!
//! ```
//! use compile_ai::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_index(10), b.gen_index(10));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness for AI decisions.
pub trait RandomSource: Send {
    /// Return `true` with the given probability (clamped to `[0, 1]`).
    fn gen_bool(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn gen_index(&mut self, len: usize) -> usize;
}

/// Deterministic ChaCha8-backed RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn gen_bool(&mut self, probability: f64) -> bool {
        let p = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.inner.gen_bool(p)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "gen_index on empty range");
        self.inner.gen_range(0..len.max(1))
    }
}

/// Scripted randomness for tests.
///
/// `gen_bool` answers from a fixed script (repeating the last answer once
/// exhausted, `false` if empty); `gen_index` always returns
/// `index % len`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    rolls: Vec<bool>,
    cursor: usize,
    index: usize,
}

impl ScriptedRandom {
    /// Never triggers a random event; always picks index 0.
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    /// Always triggers random events; always picks index 0.
    #[must_use]
    pub fn always() -> Self {
        Self {
            rolls: vec![true],
            ..Self::default()
        }
    }

    /// Answer `gen_bool` calls from the given script.
    #[must_use]
    pub fn with_rolls(rolls: impl Into<Vec<bool>>) -> Self {
        Self {
            rolls: rolls.into(),
            ..Self::default()
        }
    }

    /// Index to return from `gen_index` (reduced modulo the range).
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn gen_bool(&mut self, _probability: f64) -> bool {
        let roll = self
            .rolls
            .get(self.cursor)
            .or_else(|| self.rolls.last())
            .copied()
            .unwrap_or(false);
        self.cursor += 1;
        roll
    }

    fn gen_index(&mut self, len: usize) -> usize {
        self.index % len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_index(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_index(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_gen_bool_extremes() {
        let mut rng = GameRng::new(7);
        for _ in 0..50 {
            assert!(!rng.gen_bool(0.0));
            assert!(rng.gen_bool(1.0));
        }
        // Out-of-range and NaN probabilities are clamped rather than panicking.
        assert!(rng.gen_bool(3.0));
        assert!(!rng.gen_bool(f64::NAN));
    }

    #[test]
    fn test_scripted_rolls() {
        let mut rng = ScriptedRandom::with_rolls([true, false]);
        assert!(rng.gen_bool(0.5));
        assert!(!rng.gen_bool(0.5));
        // Exhausted: repeats last answer.
        assert!(!rng.gen_bool(0.5));

        let mut never = ScriptedRandom::never();
        assert!(!never.gen_bool(1.0));

        let mut picker = ScriptedRandom::never().with_index(5);
        assert_eq!(picker.gen_index(3), 2);
    }
}
