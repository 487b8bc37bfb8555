//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(context, trial)` pair. Sub-seeds are derived via BLAKE3 hashing,
//! independently of evaluation order, so parallel bootstrap trials produce
//! identical results regardless of thread scheduling.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
///
/// The master seed is expanded into per-(context, trial) sub-seeds using
/// BLAKE3. Because derivation is hash-based (not order-dependent), the same
/// master seed produces identical sub-seeds regardless of the order in which
/// trials are processed.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// A hierarchy with a master seed drawn from OS entropy. Repeated
    /// simulation calls built this way are expected to differ.
    pub fn from_entropy() -> Self {
        Self {
            master_seed: rand::random(),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a specific (context, trial).
    ///
    /// Context strings partition the stream, e.g. `"NQ/band=1.00"` keeps one
    /// sweep band's trials independent of another's.
    pub fn sub_seed(&self, context: &str, trial: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(context.as_bytes());
        hasher.update(&trial.to_le_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// Create a seeded StdRng for a (context, trial).
    pub fn rng_for(&self, context: &str, trial: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(context, trial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_seeds_are_deterministic() {
        let h = SeedHierarchy::new(42);
        assert_eq!(h.sub_seed("NQ/band=1.00", 0), h.sub_seed("NQ/band=1.00", 0));
    }

    #[test]
    fn different_contexts_different_seeds() {
        let h = SeedHierarchy::new(42);
        assert_ne!(h.sub_seed("NQ/band=1.00", 0), h.sub_seed("NQ/band=0.50", 0));
    }

    #[test]
    fn different_trials_different_seeds() {
        let h = SeedHierarchy::new(42);
        assert_ne!(h.sub_seed("NQ/band=1.00", 0), h.sub_seed("NQ/band=1.00", 1));
    }

    #[test]
    fn derivation_order_independent() {
        let h = SeedHierarchy::new(42);

        let a_first = h.sub_seed("a", 0);
        let b_second = h.sub_seed("b", 0);

        let b_first = h.sub_seed("b", 0);
        let a_second = h.sub_seed("a", 0);

        assert_eq!(a_first, a_second);
        assert_eq!(b_first, b_second);
    }

    #[test]
    fn different_master_seeds_different_output() {
        assert_ne!(
            SeedHierarchy::new(42).sub_seed("a", 0),
            SeedHierarchy::new(43).sub_seed("a", 0)
        );
    }
}
