//! Random source for sampling. The engine never calls an RNG directly so
//! tests can swap in a fixed order.

use rand::seq::SliceRandom;

pub trait Shuffler: Send + Sync {
    fn shuffle<T>(&self, items: &mut [T]);
}

/// Uniform Fisher-Yates shuffle on the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut rand::rng());
    }
}

/// Leaves items in their original order.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShuffle;

impl Shuffler for NoShuffle {
    fn shuffle<T>(&self, _items: &mut [T]) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseShuffle;

impl Shuffler for ReverseShuffle {
    fn shuffle<T>(&self, items: &mut [T]) {
        items.reverse();
    }
}
