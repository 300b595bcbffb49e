//! Round controllers for both game variants.
//!
//! A session owns its question list, a 0-based cursor that only moves
//! forward, the score and the results recorded so far. Word masks are drawn
//! once, when the session is generated.

use crate::domain::{
  HidePolicy, MultipleChoiceItem, OptionKey, QuizRoundResult, WordCard, WordPuzzle, WordRoundResult,
};
use crate::error::GameError;
use crate::guess::GuessState;
use crate::masking::mask_word;
use crate::provider::select;
use crate::rng::IndexSource;
use tracing::debug;

/// What happened after a round was closed.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundOutcome<R> {
  Continue { next_index: usize },
  Finished { score: u32, total: u32, results: Vec<R> },
}

#[derive(Clone, Debug)]
pub struct WordSession {
  puzzles: Vec<WordPuzzle>,
  index: usize,
  score: u32,
  results: Vec<WordRoundResult>,
  guess: GuessState,
  finished: bool,
}

impl WordSession {
  /// `None` for an empty puzzle list: there is nothing to play.
  pub fn new(puzzles: Vec<WordPuzzle>) -> Option<Self> {
    let guess = GuessState::new(&puzzles.first()?.mask);
    Some(Self { puzzles, index: 0, score: 0, results: Vec::new(), guess, finished: false })
  }

  /// Pick up to `max_count` cards and draw a mask for each of them.
  pub fn generate<S: IndexSource + ?Sized>(
    cards: Vec<WordCard>,
    policy: HidePolicy,
    max_count: usize,
    randomize: bool,
    rng: &mut S,
  ) -> Option<Self> {
    let puzzles = select(cards, max_count, randomize, &mut *rng)
      .into_iter()
      .map(|card| {
        let mask = mask_word(&card.word, policy, &mut *rng);
        debug!(
          target: "session",
          id = %card.id,
          blanks = mask.blank_count(),
          visible = mask.visible_letter_count(),
          "Mask drawn"
        );
        WordPuzzle::new(card, mask)
      })
      .collect();
    Self::new(puzzles)
  }

  pub fn current(&self) -> &WordPuzzle { &self.puzzles[self.index] }
  pub fn guess(&self) -> &GuessState { &self.guess }
  pub fn index(&self) -> usize { self.index }
  pub fn score(&self) -> u32 { self.score }
  pub fn total(&self) -> usize { self.puzzles.len() }

  pub fn type_char(&mut self, c: char) -> Result<bool, GameError> {
    self.ensure_open()?;
    Ok(self.guess.type_char(c))
  }

  pub fn backspace(&mut self) -> Result<bool, GameError> {
    self.ensure_open()?;
    Ok(self.guess.backspace())
  }

  /// Submit the complete guess: one point when it matches the answer.
  pub fn confirm(&mut self) -> Result<RoundOutcome<WordRoundResult>, GameError> {
    self.ensure_open()?;
    if !self.guess.is_complete() {
      return Err(GameError::IncompleteGuess);
    }
    let correct = self.guess.matches(&self.current().word);
    Ok(self.close_round(Some(self.guess.guess()), correct))
  }

  /// Move on without answering. Scores nothing and records no answer.
  pub fn skip(&mut self) -> Result<RoundOutcome<WordRoundResult>, GameError> {
    self.ensure_open()?;
    Ok(self.close_round(None, false))
  }

  fn ensure_open(&self) -> Result<(), GameError> {
    if self.finished { Err(GameError::SessionFinished) } else { Ok(()) }
  }

  fn close_round(&mut self, user_answer: Option<String>, correct: bool) -> RoundOutcome<WordRoundResult> {
    let puzzle = self.current().clone();
    if correct {
      self.score += 1;
    }
    self.results.push(WordRoundResult {
      correct_answer: puzzle.word.clone(),
      puzzle,
      user_answer,
      is_correct: correct,
    });

    if self.index + 1 < self.puzzles.len() {
      self.index += 1;
      let mask = self.puzzles[self.index].mask.clone();
      self.guess.reset(&mask);
      RoundOutcome::Continue { next_index: self.index }
    } else {
      self.finished = true;
      RoundOutcome::Finished {
        score: self.score,
        total: self.puzzles.len() as u32,
        results: self.results.clone(),
      }
    }
  }
}

#[derive(Clone, Debug)]
pub struct QuizSession {
  items: Vec<MultipleChoiceItem>,
  index: usize,
  score: u32,
  results: Vec<QuizRoundResult>,
  selected: Option<OptionKey>,
  finished: bool,
}

impl QuizSession {
  pub fn new(items: Vec<MultipleChoiceItem>) -> Option<Self> {
    if items.is_empty() {
      return None;
    }
    Some(Self { items, index: 0, score: 0, results: Vec::new(), selected: None, finished: false })
  }

  pub fn generate<S: IndexSource + ?Sized>(
    items: Vec<MultipleChoiceItem>,
    max_count: usize,
    randomize: bool,
    rng: &mut S,
  ) -> Option<Self> {
    Self::new(select(items, max_count, randomize, rng))
  }

  pub fn current(&self) -> &MultipleChoiceItem { &self.items[self.index] }
  pub fn selected(&self) -> Option<OptionKey> { self.selected }
  pub fn index(&self) -> usize { self.index }
  pub fn score(&self) -> u32 { self.score }
  pub fn total(&self) -> usize { self.items.len() }
  pub fn is_last(&self) -> bool { self.index + 1 == self.items.len() }

  /// Choose an option. Choosing again overwrites; the round does not advance.
  pub fn select(&mut self, key: OptionKey) -> Result<(), GameError> {
    self.ensure_open()?;
    self.selected = Some(key);
    Ok(())
  }

  /// Record the selected option and move on.
  pub fn next(&mut self) -> Result<RoundOutcome<QuizRoundResult>, GameError> {
    self.ensure_open()?;
    let key = self.selected.ok_or(GameError::NoSelection)?;
    Ok(self.close_round(Some(key)))
  }

  /// Record the question as skipped, discarding any pending selection.
  pub fn skip(&mut self) -> Result<RoundOutcome<QuizRoundResult>, GameError> {
    self.ensure_open()?;
    Ok(self.close_round(None))
  }

  fn ensure_open(&self) -> Result<(), GameError> {
    if self.finished { Err(GameError::SessionFinished) } else { Ok(()) }
  }

  fn close_round(&mut self, user_answer: Option<OptionKey>) -> RoundOutcome<QuizRoundResult> {
    let item = self.current().clone();
    let correct = user_answer == Some(item.correct);
    if correct {
      self.score += 1;
    }
    self.results.push(QuizRoundResult {
      correct_answer: item.correct,
      item,
      user_answer,
      is_correct: correct,
    });
    self.selected = None;

    if self.index + 1 < self.items.len() {
      self.index += 1;
      RoundOutcome::Continue { next_index: self.index }
    } else {
      self.finished = true;
      RoundOutcome::Finished {
        score: self.score,
        total: self.items.len() as u32,
        results: self.results.clone(),
      }
    }
  }
}

#[cfg(test)]
pub(crate) mod fixtures {
  use crate::domain::{MultipleChoiceItem, OptionKey, QuizOption, WordCard};

  pub fn card(word: &str) -> WordCard {
    WordCard { id: word.to_lowercase(), word: word.to_string(), hint: format!("dica de {word}"), image: None }
  }

  pub fn item(id: &str, correct: OptionKey) -> MultipleChoiceItem {
    MultipleChoiceItem {
      id: id.to_string(),
      prompt: format!("Pergunta {id}?"),
      options: OptionKey::ALL.map(|key| QuizOption { key, text: format!("{id}-{key:?}") }),
      correct,
    }
  }
}
