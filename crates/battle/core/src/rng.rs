//! Seedable randomness for opponent mode selection and critical rolls.
//!
//! The engine never owns hidden random state. Every random decision takes an
//! explicit seed, usually derived with [`compute_seed`] from the battle seed,
//! the round number and a context value, so replays reproduce exactly.

/// Deterministic random source.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// Returns `None` when every weight is zero or the slice is empty.
    fn weighted_index(&self, seed: u64, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = u64::from(self.next_u32(seed)) % total;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        None
    }

    /// Percentage check: true with `chance_pct` percent probability.
    fn chance(&self, seed: u64, chance_pct: u32) -> bool {
        self.roll_d100(seed) <= chance_pct
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Context values for [`compute_seed`].
pub mod context {
    pub const ENEMY_MODE: u32 = 0;
    pub const PLAYER_CRITICAL: u32 = 1;
    pub const ENEMY_CRITICAL: u32 = 2;
}

/// Derives the seed for one random decision.
///
/// * `battle_seed` - fixed when the battle starts
/// * `round` - round number
/// * `slot` - queue position or other per-round discriminator
/// * `context` - one of [`context`]
pub fn compute_seed(battle_seed: u64, round: u64, slot: u32, context: u32) -> u64 {
    let mut hash = battle_seed;
    hash ^= round.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(slot).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
