//! Turns an answer word into the blank layout of one puzzle round.
//!
//! Only letters are hidden: whitespace, hyphens and other separators stay
//! fixed, since they cannot be typed into a blank. `HidePolicy::Count` draws
//! a fresh random subset of the letters on every call and always leaves at
//! least one letter visible; `HidePolicy::All` blanks every letter.

use crate::domain::{Cell, HidePolicy, Mask};
use crate::rng::{shuffle, IndexSource};

pub fn mask_word<S: IndexSource + ?Sized>(word: &str, policy: HidePolicy, rng: &mut S) -> Mask {
  let chars: Vec<char> = word.chars().collect();
  let mut candidates: Vec<usize> = chars
    .iter()
    .enumerate()
    .filter(|(_, c)| c.is_alphabetic())
    .map(|(i, _)| i)
    .collect();

  let hidden = match policy {
    HidePolicy::All => candidates,
    HidePolicy::Count(n) => {
      let n = hide_count(n, candidates.len());
      shuffle(&mut candidates, rng);
      candidates.truncate(n);
      candidates
    }
  };

  let mut cells: Vec<Cell> = chars.into_iter().map(Cell::Fixed).collect();
  for i in hidden {
    cells[i] = Cell::Blank;
  }
  Mask::new(cells)
}

/// At least one blank; never the whole word unless it has a single letter.
fn hide_count(requested: usize, candidates: usize) -> usize {
  if candidates == 0 {
    return 0;
  }
  let requested = requested.max(1);
  if requested >= candidates {
    (candidates - 1).max(1)
  } else {
    requested
  }
}
