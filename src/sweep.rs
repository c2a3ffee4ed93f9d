//! Deterministic shuffled traversal over a dataset.
//!
//! A [`Sweeper`] visits a borrowed [`Dataset`] through a private permutation
//! of its indices. [`Sweeper::shuffle`] regenerates the permutation once per
//! epoch from an owned seeded RNG; [`Sweeper::set_bounds`] narrows the
//! iteration window to one mini-batch without touching the permutation. The
//! cursor, bound, and permutation are internal state: one-pass-per-epoch
//! coverage depends on nothing else mutating them.

use crate::data::Dataset;
use crate::matrix::DenseMatrix;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A windowed, shuffled iterator over a dataset.
#[derive(Debug)]
pub struct Sweeper<'a, D: Dataset + ?Sized> {
    set: &'a D,
    cursor: usize,
    upper_bound: usize,
    order: Vec<usize>,
    rng: StdRng,
}

impl<'a, D: Dataset + ?Sized> Sweeper<'a, D> {
    /// A sweeper over `set` in identity order, with its shuffle RNG seeded
    /// deterministically by `seed`.
    pub fn new(set: &'a D, seed: u64) -> Self {
        Self {
            set,
            cursor: 0,
            upper_bound: set.count(),
            order: (0..set.count()).collect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Regenerate the access permutation and reset the window to the full
    /// dataset. Called once per epoch.
    pub fn shuffle(&mut self) {
        self.cursor = 0;
        self.upper_bound = self.set.count();
        self.order.shuffle(&mut self.rng);
    }

    /// Narrow the iteration window to `[begin, end)` without altering the
    /// permutation. Called once per mini-batch.
    pub fn set_bounds(&mut self, begin: usize, end: usize) {
        self.cursor = begin;
        self.upper_bound = end;
    }

    /// The next `(input, target)` pair in the current window, or `None` when
    /// the window is exhausted.
    ///
    /// Exhaustion is the normal end-of-window outcome, not an error. Each call
    /// advances the cursor exactly once.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&'a DenseMatrix, &'a DenseMatrix)> {
        if self.cursor >= self.upper_bound || self.cursor >= self.set.count() {
            return None;
        }
        let idx = self.order[self.cursor];
        self.cursor += 1;
        Some(self.set.sample(idx))
    }
}
