//! Injectable randomness for shuffling and simulation.

/// A source of uniform random indices.
///
/// Everything in the crate that shuffles takes a `RandomSource` so callers
/// can swap the process RNG for a seeded or scripted one.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..bound`. `bound` is never 0.
    fn index(&mut self, bound: usize) -> usize;

    /// Fisher-Yates shuffle driven by [`RandomSource::index`].
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl RandomSource for fastrand::Rng {
    #[inline]
    fn index(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }

    #[inline]
    fn shuffle<T>(&mut self, items: &mut [T]) {
        fastrand::Rng::shuffle(self, items);
    }
}

/// Replays a fixed list of indices, wrapping around when exhausted.
///
/// Values are reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<usize>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<usize>) -> Self {
        ScriptedSource { values, pos: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn index(&mut self, bound: usize) -> usize {
        if self.values.is_empty() {
            return bound - 1;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % bound
    }
}

/// Always picks the last index, leaving shuffled slices untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySource;

impl RandomSource for IdentitySource {
    #[inline]
    fn index(&mut self, bound: usize) -> usize {
        bound - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_shuffle_keeps_order() {
        let mut items = [1, 2, 3, 4, 5];
        IdentitySource.shuffle(&mut items);
        assert_eq!(items, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn scripted_shuffle_is_deterministic() {
        // i=3 -> swap(3, 0), i=2 -> swap(2, 0), i=1 -> swap(1, 0)
        let mut items = ['a', 'b', 'c', 'd'];
        ScriptedSource::new(vec![0]).shuffle(&mut items);
        assert_eq!(items, ['b', 'c', 'd', 'a']);
    }

    #[test]
    fn rng_shuffle_matches_fastrand() {
        let mut a: Vec<u8> = (0..20).collect();
        let mut b = a.clone();
        RandomSource::shuffle(&mut fastrand::Rng::with_seed(7), &mut a);
        fastrand::Rng::with_seed(7).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_rng_repeats() {
        let mut a: Vec<u8> = (0..20).collect();
        let mut b = a.clone();
        RandomSource::shuffle(&mut fastrand::Rng::with_seed(42), &mut a);
        RandomSource::shuffle(&mut fastrand::Rng::with_seed(42), &mut b);
        assert_eq!(a, b);
        assert_ne!(a, (0..20).collect::<Vec<u8>>());
    }
}
