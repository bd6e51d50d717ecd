use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly shuffled copy of `items` (Fisher-Yates).
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Shuffles a copy of `pool` and keeps the first `count` elements.
/// An undersized pool is returned whole.
pub fn select_subset<T: Clone, R: Rng + ?Sized>(pool: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut subset = shuffle(pool, rng);
    subset.truncate(count);
    subset
}
