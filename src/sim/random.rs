//! Random integers for ball placement and swap selection
//!
//! Prefers a CSPRNG seeded from OS entropy (`crypto.getRandomValues` in the
//! browser). If entropy is unavailable it falls back to a clock-seeded PCG
//! without raising anything: a weaker shuffle beats no shuffle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform integer in `[0, max_exclusive)`. A bound of 0 behaves like 1.
    fn next_int(&mut self, max_exclusive: usize) -> usize;
}

#[derive(Debug, Clone)]
enum Generator {
    Strong(StdRng),
    Fallback(Pcg32),
}

/// The game's dice
#[derive(Debug, Clone)]
pub struct Dice {
    generator: Generator,
}

impl Dice {
    /// OS-seeded generator, or the clock-seeded fallback when entropy fails
    pub fn system() -> Self {
        match StdRng::try_from_os_rng() {
            Ok(rng) => Self {
                generator: Generator::Strong(rng),
            },
            Err(err) => {
                let seed = clock_seed();
                log::warn!("OS entropy unavailable ({err}), falling back to PCG seeded with {seed}");
                Self {
                    generator: Generator::Fallback(Pcg32::seed_from_u64(seed)),
                }
            }
        }
    }

    /// Deterministic generator (tests, headless demo)
    pub fn seeded(seed: u64) -> Self {
        Self {
            generator: Generator::Fallback(Pcg32::seed_from_u64(seed)),
        }
    }

    /// Whether the cryptographically strong generator is in use
    pub fn is_strong(&self) -> bool {
        matches!(self.generator, Generator::Strong(_))
    }
}

impl RandomSource for Dice {
    fn next_int(&mut self, max_exclusive: usize) -> usize {
        let bound = max_exclusive.max(1);
        match &mut self.generator {
            Generator::Strong(rng) => rng.random_range(0..bound),
            Generator::Fallback(rng) => rng.random_range(0..bound),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = Dice::seeded(42);
        let mut b = Dice::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_int(3), b.next_int(3));
        }
        assert!(!a.is_strong());
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut dice = Dice::system();
        for n in 1..6 {
            for _ in 0..200 {
                assert!(dice.next_int(n) < n);
            }
        }
    }

    #[test]
    fn test_zero_bound_returns_zero() {
        let mut dice = Dice::seeded(7);
        assert_eq!(dice.next_int(0), 0);
        assert_eq!(dice.next_int(1), 0);
    }

    #[test]
    fn test_every_value_is_reachable() {
        let mut dice = Dice::seeded(12345);
        let mut seen = [false; 3];
        for _ in 0..300 {
            seen[dice.next_int(3)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
