//! Deterministic Random Number Generator
//!
//! Park–Miller minimal standard generator: `state = state * 16807 mod (2^31 - 1)`.
//! Given the same seed, produces identical sequence on all platforms.
//!
//! The product is computed in `u64`, so seeds up to `u32::MAX` never lose
//! precision and every draw matches the double-precision reference sequence.

use serde::{Serialize, Deserialize};

/// Modulus of the generator (the Mersenne prime 2^31 - 1).
pub const LCG_MODULUS: u64 = 2_147_483_647;

/// Multiplier of the generator (7^5).
pub const LCG_MULTIPLIER: u64 = 16_807;

/// Deterministic PRNG producing floats in `[0, 1)`.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of floats on any platform.
///
/// # Example
///
/// ```
/// use logic_looper::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(42);
/// assert_eq!(rng.next_state(), 705_894);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// The seed is used as the initial state as-is. A seed that is a
    /// multiple of the modulus (including 0) yields an all-zero sequence.
    pub fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    /// Advance the generator and return the raw state in `[0, 2^31 - 1)`.
    #[inline]
    pub fn next_state(&mut self) -> u64 {
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
        self.state
    }

    /// Generate the next float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_state() as f64 / LCG_MODULUS as f64
    }

    /// Generate a random index in range `[0, len)` as `floor(next * len)`.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len - 1)
    }

    /// Generate a random integer in range `[min, max]`.
    #[inline]
    pub fn next_int_range(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        min + self.next_index((max - min + 1) as usize) as u64
    }

    /// Generate a random bit (0 or 1).
    #[inline]
    pub fn next_bit(&mut self) -> u8 {
        self.next_index(2) as u8
    }

    /// Select a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_index(slice.len());
            Some(&slice[idx])
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u64 {
        self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================
