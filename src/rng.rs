//! Random index source shared by question selection and word masking.
//!
//! Every `rand` generator is an `IndexSource`; tests plug in scripted
//! sequences to pin exact shuffles.

use rand::{Rng, RngCore};

pub trait IndexSource {
  /// Uniform index in `0..bound`. Callers never pass a zero bound.
  fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: RngCore> IndexSource for R {
  fn next_index(&mut self, bound: usize) -> usize {
    self.gen_range(0..bound)
  }
}

/// Fisher-Yates, walking from the last element down.
pub fn shuffle<T, S: IndexSource + ?Sized>(items: &mut [T], rng: &mut S) {
  for i in (1..items.len()).rev() {
    let j = rng.next_index(i + 1);
    items.swap(i, j);
  }
}
