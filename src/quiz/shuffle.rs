//! Unbiased in-place shuffling

use rand::Rng;

/// Fisher-Yates shuffle driven by `rng`
///
/// Walks from the last index down to 1, swapping each element with a
/// uniformly chosen one at or before it, so every permutation is equally
/// likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
