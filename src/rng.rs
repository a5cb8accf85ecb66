//! Noise sources for the simulation.
//!
//! Each reserve gets its own ChaCha stream derived from (seed, reserve name), so
//! the same seed replays the same trajectory no matter which reserves were
//! simulated before it or in which order.

use rand::{Error, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    /// Draws a fresh master seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.master_seed
    }

    pub fn stream(&self, label: &str) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(label))
    }

    fn derive_seed(&self, label: &str) -> u64 {
        // FNV-1a over the label, then the same LCG mixing as the tick streams.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in label.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= hash;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

/// An `RngCore` whose uniform `f64` draws always equal the same value.
///
/// `Standard` builds an `f64` in `[0, 1)` from the top 53 bits of `next_u64`,
/// so storing `unit * 2^53` in those bits makes every `gen::<f64>()` return
/// `unit` exactly for any dyadic `unit` with at most 53 significant bits.
#[derive(Clone, Copy, Debug)]
pub struct FixedDraw {
    bits: u64,
}

impl FixedDraw {
    pub fn new(unit: f64) -> Self {
        let unit = unit.clamp(0.0, 1.0 - f64::EPSILON);
        let mantissa = (unit * (1_u64 << 53) as f64) as u64;
        Self {
            bits: mantissa << 11,
        }
    }

    /// Every draw is 0.5, which cancels the multiplicative perturbation.
    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl RngCore for FixedDraw {
    fn next_u32(&mut self) -> u32 {
        (self.bits >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.bits
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let bytes = self.bits.to_le_bytes();
        for chunk in dest.chunks_mut(bytes.len()) {
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
