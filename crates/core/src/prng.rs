//! Seedable PRNG used for particle placement and noise seeding.
//!
//! Xorshift64 keeps runs reproducible: the same run seed places every
//! particle at the same spot on every platform.

use serde::{Deserialize, Serialize};

/// Xorshift64 generator with shifts (13, 7, 17).
///
/// A seed of 0 is a fixed point of the algorithm and is replaced with a
/// non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_F10E_F1E1_D000;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Upper 32 bits of the next value. Used to seed Perlin noise.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform f64 in [0, 1) built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_for_seed_42_is_pinned() {
        // Changing this value changes every particle layout for a given run seed.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn next_u32_is_upper_half() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        assert_eq!(a.next_u32(), (b.next_u64() >> 32) as u32);
    }

    #[test]
    fn clone_continues_identically() {
        let mut rng = Xorshift64::new(7);
        for _ in 0..10 {
            rng.next_u64();
        }
        let mut copy = rng.clone();
        assert_eq!(rng.next_f64().to_bits(), copy.next_f64().to_bits());
    }

    #[test]
    fn serialization_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..25 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..50 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v}");
                }
            }
        }
    }
}
