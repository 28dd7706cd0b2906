//! Shuffle selection for "next"
//!
//! Shuffle never reorders the active playlist. Instead, each "next" picks a
//! uniformly random index other than the current one, by rejection sampling
//! with a bounded number of rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random index picker used by the state machine
#[derive(Debug, Clone)]
pub struct ShufflePicker {
    rng: StdRng,
    max_rolls: u32,
}

impl ShufflePicker {
    /// Create a picker seeded from the OS, or from `seed` for reproducible runs
    pub fn new(seed: Option<u64>, max_rolls: u32) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_rolls: max_rolls.max(1),
        }
    }

    /// Pick the next index in a playlist of `len` tracks
    ///
    /// - `len == 0` → `None`
    /// - `len == 1` → the current index (or 0)
    /// - otherwise a uniform index different from `current`; with no current
    ///   index any position is allowed
    pub fn pick(&mut self, len: usize, current: Option<usize>) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(0);
        }

        let Some(current) = current.filter(|&c| c < len) else {
            return Some(self.rng.gen_range(0..len));
        };

        for _ in 0..self.max_rolls {
            let candidate = self.rng.gen_range(0..len);
            if candidate != current {
                return Some(candidate);
            }
        }

        // Out of rolls: uniform over the other len - 1 positions
        let offset = self.rng.gen_range(1..len);
        Some((current + offset) % len)
    }
}

impl Default for ShufflePicker {
    fn default() -> Self {
        Self::new(None, 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn empty_playlist_has_no_pick() {
        let mut picker = ShufflePicker::new(Some(1), 32);
        assert_eq!(picker.pick(0, None), None);
    }

    #[test]
    fn single_track_stays_put() {
        let mut picker = ShufflePicker::new(Some(1), 32);
        for _ in 0..10 {
            assert_eq!(picker.pick(1, Some(0)), Some(0));
        }
    }

    #[test]
    fn never_repeats_current() {
        let mut picker = ShufflePicker::new(Some(42), 32);
        for _ in 0..500 {
            let pick = picker.pick(2, Some(1)).unwrap();
            assert_eq!(pick, 0);
        }
    }

    #[test]
    fn fallback_after_exhausted_rolls_still_avoids_current() {
        // One roll only, so the fallback path runs often
        let mut picker = ShufflePicker::new(Some(7), 1);
        for _ in 0..500 {
            let pick = picker.pick(3, Some(2)).unwrap();
            assert_ne!(pick, 2);
            assert!(pick < 3);
        }
    }

    #[test]
    fn covers_every_other_index() {
        let mut picker = ShufflePicker::new(Some(3), 32);
        let seen: HashSet<usize> = (0..1000).filter_map(|_| picker.pick(6, Some(0))).collect();

        assert_eq!(seen, (1..6).collect());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ShufflePicker::new(Some(99), 32);
        let mut b = ShufflePicker::new(Some(99), 32);

        let seq_a: Vec<_> = (0..20).map(|_| a.pick(10, Some(4))).collect();
        let seq_b: Vec<_> = (0..20).map(|_| b.pick(10, Some(4))).collect();
        assert_eq!(seq_a, seq_b);
    }
}
