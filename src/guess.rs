//! The guess being built for the active word puzzle.
//!
//! Typed letters go into the first empty blank, backspace clears the last
//! filled blank. Fixed cells are copied from the mask and never change.

use crate::domain::{Cell, Mask};
use crate::util::normalize_answer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessState {
  mask: Mask,
  slots: Vec<Option<char>>,
}

impl GuessState {
  pub fn new(mask: &Mask) -> Self {
    let slots = mask
      .cells()
      .iter()
      .map(|c| match c {
        Cell::Fixed(ch) => Some(*ch),
        Cell::Blank => None,
      })
      .collect();
    Self { mask: mask.clone(), slots }
  }

  /// Switch to another puzzle, dropping everything typed so far.
  pub fn reset(&mut self, mask: &Mask) {
    *self = Self::new(mask);
  }

  pub fn slots(&self) -> &[Option<char>] { &self.slots }

  pub fn mask(&self) -> &Mask { &self.mask }

  /// Index the next typed letter would land in.
  pub fn next_slot(&self) -> Option<usize> {
    (0..self.slots.len()).find(|&i| self.mask.is_blank(i) && self.slots[i].is_none())
  }

  /// Write an uppercased letter into the first empty blank.
  /// Non-alphabetic input and input on a complete guess are ignored.
  pub fn type_char(&mut self, c: char) -> bool {
    if !c.is_alphabetic() {
      return false;
    }
    let Some(upper) = c.to_uppercase().next() else { return false };
    match self.next_slot() {
      Some(i) => {
        self.slots[i] = Some(upper);
        true
      }
      None => false,
    }
  }

  /// Clear the rightmost filled blank.
  pub fn backspace(&mut self) -> bool {
    let last = (0..self.slots.len())
      .rev()
      .find(|&i| self.mask.is_blank(i) && self.slots[i].is_some());
    match last {
      Some(i) => {
        self.slots[i] = None;
        true
      }
      None => false,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.slots.iter().all(Option::is_some)
  }

  /// Slots joined in order; empty blanks contribute nothing.
  pub fn guess(&self) -> String {
    self.slots.iter().flatten().collect()
  }

  /// Accent- and case-insensitive comparison against the answer.
  pub fn matches(&self, word: &str) -> bool {
    normalize_answer(&self.guess()) == normalize_answer(word)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::HidePolicy;
  use crate::masking::mask_word;
  use crate::rng::testing::Scripted;
  use pretty_assertions::assert_eq;
  use rand::{rngs::StdRng, SeedableRng};

  fn femur() -> Mask {
    // F _ M _ R
    Mask::new(vec![Cell::Fixed('F'), Cell::Blank, Cell::Fixed('M'), Cell::Blank, Cell::Fixed('R')])
  }

  #[test]
  fn fixed_cells_are_prefilled() {
    let g = GuessState::new(&femur());
    assert_eq!(g.slots(), &[Some('F'), None, Some('M'), None, Some('R')]);
    assert!(!g.is_complete());
    assert_eq!(g.next_slot(), Some(1));
  }

  #[test]
  fn typing_fills_blanks_left_to_right() {
    let mut g = GuessState::new(&femur());
    assert!(g.type_char('e'));
    assert_eq!(g.slots()[1], Some('E'));
    assert!(g.type_char('u'));
    assert_eq!(g.slots()[3], Some('U'));
    assert!(g.is_complete());
    assert!(!g.type_char('x'));
    assert_eq!(g.guess(), "FEMUR");
  }

  #[test]
  fn non_letters_are_ignored() {
    let mut g = GuessState::new(&femur());
    assert!(!g.type_char('1'));
    assert!(!g.type_char(' '));
    assert!(!g.type_char('-'));
    assert_eq!(g.next_slot(), Some(1));
  }

  #[test]
  fn backspace_undoes_in_reverse_order() {
    let mut g = GuessState::new(&femur());
    g.type_char('a');
    g.type_char('b');
    assert!(g.backspace());
    assert_eq!(g.slots()[3], None);
    assert_eq!(g.slots()[1], Some('A'));
    assert!(g.backspace());
    assert_eq!(g.slots()[1], None);
    assert!(!g.backspace());
    assert_eq!(g.slots(), &[Some('F'), None, Some('M'), None, Some('R')]);
  }

  #[test]
  fn typing_never_touches_fixed_cells() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
      let mask = mask_word("VERTEBRA CERVICAL", HidePolicy::Count(3), &mut rng);
      let mut g = GuessState::new(&mask);
      for c in "QQQQQQQQ".chars() {
        g.type_char(c);
      }
      for (i, cell) in mask.cells().iter().enumerate() {
        if let Cell::Fixed(ch) = cell {
          assert_eq!(g.slots()[i], Some(*ch));
        }
      }
      assert!(g.is_complete());
    }
  }

  #[test]
  fn accented_answer_matches_plain_input() {
    let mask = mask_word("FÊMUR", HidePolicy::All, &mut Scripted::identity());
    let mut g = GuessState::new(&mask);
    for c in "femur".chars() {
      g.type_char(c);
    }
    assert!(g.matches("FÊMUR"));
    assert!(!g.matches("FEMUS"));
  }

  #[test]
  fn reset_switches_puzzle() {
    let mut g = GuessState::new(&femur());
    g.type_char('e');
    let atlas = mask_word("ATLAS", HidePolicy::All, &mut Scripted::identity());
    g.reset(&atlas);
    assert_eq!(g.slots().len(), 5);
    assert!(g.slots().iter().all(Option::is_none));
  }

  #[test]
  fn typing_the_whole_word_completes_any_layout() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..30 {
      let mask = mask_word("FEMUR", HidePolicy::Count(2), &mut rng);
      let mut g = GuessState::new(&mask);
      for (i, c) in "FEMUR".chars().enumerate() {
        if mask.is_blank(i) {
          g.type_char(c);
        }
      }
      assert!(g.is_complete());
      assert!(g.matches("FEMUR"));
    }
  }
}
