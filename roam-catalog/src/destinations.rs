use rand::seq::SliceRandom;
use rand::Rng;

/// Picks up to `limit` distinct entries in random order.
pub fn sample_popular<T: Clone, R: Rng + ?Sized>(items: &[T], limit: usize, rng: &mut R) -> Vec<T> {
    items.choose_multiple(rng, limit.min(items.len())).cloned().collect()
}
