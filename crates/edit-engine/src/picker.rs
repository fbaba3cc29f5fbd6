//! Candidate selection for swaps and fresh drafts.

use makeitmeme_feed_model::AssetId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Chooses one asset out of a candidate slice.
pub trait AssetPicker: Send {
    /// Pick a candidate, or `None` if `candidates` is empty.
    fn pick<'a>(&mut self, candidates: &'a [AssetId]) -> Option<&'a AssetId>;
}

/// Uniform random choice.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetPicker for RandomPicker {
    fn pick<'a>(&mut self, candidates: &'a [AssetId]) -> Option<&'a AssetId> {
        candidates.choose(&mut self.rng)
    }
}

/// Always takes the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl AssetPicker for FirstPicker {
    fn pick<'a>(&mut self, candidates: &'a [AssetId]) -> Option<&'a AssetId> {
        candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<AssetId> {
        ["m1", "m2", "m3", "m4"].into_iter().map(AssetId::from).collect()
    }

    #[test]
    fn test_empty_pool_yields_none() {
        assert!(RandomPicker::seeded(1).pick(&[]).is_none());
        assert!(FirstPicker.pick(&[]).is_none());
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let pool = pool();
        let mut a = RandomPicker::seeded(42);
        let mut b = RandomPicker::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.pick(&pool), b.pick(&pool));
        }
    }

    #[test]
    fn test_random_picker_stays_in_pool() {
        let pool = pool();
        let mut picker = RandomPicker::new();
        for _ in 0..32 {
            let picked = picker.pick(&pool).unwrap();
            assert!(pool.contains(picked));
        }
    }
}
