use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Source of the random decisions taken by placement and diffusion.
///
/// The lattice owns one of these. Seeding it makes a whole run reproducible,
/// and tests can swap in a scripted source to force exact moves.
pub trait RandomSource {
    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool;

    /// Uniform integer in `0..upper`. `upper` is never zero.
    fn index_below(&mut self, upper: usize) -> usize;

    /// Uniform random permutation of `items`, in place.
    fn shuffle_slice<T>(&mut self, items: &mut [T]) {
        // Fisher-Yates
        for i in (1..items.len()).rev() {
            let j = self.index_below(i + 1);
            items.swap(i, j);
        }
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let index = self.index_below(items.len());
            items.get(index)
        }
    }
}

impl RandomSource for StdRng {
    #[inline(always)]
    fn coin_flip(&mut self) -> bool {
        Rng::random_bool(self, 0.5)
    }

    #[inline(always)]
    fn index_below(&mut self, upper: usize) -> usize {
        Rng::random_range(self, 0..upper)
    }

    #[inline(always)]
    fn shuffle_slice<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// Replays a fixed list of draws. Shuffling keeps the slice order untouched so
/// tests can predict which direction a particle tries first.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    draws: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(draws: &[usize]) -> Self {
        ScriptedSource { draws: draws.iter().copied().collect() }
    }

    fn next(&mut self) -> usize {
        self.draws.pop_front().expect("scripted source ran out of draws")
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn coin_flip(&mut self) -> bool {
        self.next() != 0
    }

    fn index_below(&mut self, upper: usize) -> usize {
        self.next() % upper
    }

    fn shuffle_slice<T>(&mut self, _items: &mut [T]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let draws_a: Vec<usize> = (0..32).map(|_| a.index_below(100)).collect();
        let draws_b: Vec<usize> = (0..32).map(|_| b.index_below(100)).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|&d| d < 100));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items = [1, 2, 3, 4];
        rng.shuffle_slice(&mut items);
        let mut sorted = items;
        sorted.sort();
        assert_eq!(sorted, [1, 2, 3, 4]);
    }

    #[test]
    fn pick_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick(&[5]), Some(&5));
    }

    #[test]
    fn scripted_source_replays_draws() {
        let mut scripted = ScriptedSource::new(&[1, 0, 7]);
        assert!(scripted.coin_flip());
        assert!(!scripted.coin_flip());
        assert_eq!(scripted.index_below(5), 2);
    }
}
