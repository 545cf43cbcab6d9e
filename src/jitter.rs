//! Seedable randomness for particle dispersion.
//!
//! Dispersed positions are the only random input to the engine. Keeping the
//! generator behind [`Jitter`] lets tests seed it and get identical clouds on
//! every run.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Default spread of dispersed particles around their homes.
pub const DIFFUSION_RADIUS: f32 = 250.0;

/// Random source for dispersion offsets.
#[derive(Debug, Clone)]
pub struct Jitter {
    rng: SmallRng,
}

impl Jitter {
    /// Seed from the current time, different each program execution.
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Deterministic generator for reproducible clouds.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Per-axis offset of `(random - 0.5) * radius`.
    ///
    /// Every component lies within `[-radius/2, radius/2)`.
    pub fn offset(&mut self, radius: f32) -> Vec3 {
        Vec3::new(
            (self.random() - 0.5) * radius,
            (self.random() - 0.5) * radius,
            (self.random() - 0.5) * radius,
        )
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::from_time()
    }
}

impl RngCore for Jitter {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_bounds() {
        let mut jitter = Jitter::seeded(1);
        for _ in 0..1000 {
            let o = jitter.offset(DIFFUSION_RADIUS);
            assert!(o.abs().max_element() <= DIFFUSION_RADIUS * 0.5);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Jitter::seeded(99);
        let mut b = Jitter::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.offset(10.0), b.offset(10.0));
        }
    }

    #[test]
    fn test_zero_radius_is_no_offset() {
        let mut jitter = Jitter::seeded(5);
        assert_eq!(jitter.offset(0.0), Vec3::ZERO);
    }
}
