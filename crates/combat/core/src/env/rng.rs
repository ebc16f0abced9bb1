//! Deterministic random rolls.
//!
//! Every roll is a pure function of a seed, so replaying an encounter with the
//! same encounter seed and the same submitted actions reproduces every
//! critical, parry and effect roll.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// True with `percent` chance. Zero never passes; 100 or more always does.
    fn chance(&self, seed: u64, percent: i32) -> bool {
        match percent {
            p if p <= 0 => false,
            p if p >= 100 => true,
            p => self.roll_d100(seed) <= p as u32,
        }
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

/// Always rolls the same d100 value. Lets tests pin every roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRolls(u32);

impl FixedRolls {
    /// Every d100 comes up `roll` (clamped to 1..=100).
    pub fn always(roll: u32) -> Self {
        Self(roll.clamp(1, 100))
    }

    /// Rolls that pass any non-zero chance.
    pub fn lucky() -> Self {
        Self::always(1)
    }

    /// Rolls that fail any chance below 100.
    pub fn unlucky() -> Self {
        Self::always(100)
    }
}

impl RngOracle for FixedRolls {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0 - 1
    }
}

/// Mixes the encounter seed, action nonce, acting battler and roll context
/// into one seed.
///
/// Use distinct `context` values for independent rolls within one action.
pub fn compute_seed(encounter_seed: u64, nonce: u64, battler: u32, context: u32) -> u64 {
    let mut hash = encounter_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (battler as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
