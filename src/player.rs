//! Per-player navigation state: which screen is shown, the active game (if
//! any), and the generation counter that keeps a late question fetch from
//! landing in a session that was reset or replaced meanwhile.

use serde::{Deserialize, Serialize};

use crate::config::GameOptions;
use crate::domain::{OptionKey, QuizRoundResult, QuizTier, WordRoundResult, WordTier};
use crate::error::GameError;
use crate::results::{QuizResultSummary, WordResultSummary};
use crate::session::{QuizSession, RoundOutcome, WordSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
  Home,
  Difficulty,
  QuizDifficulty,
  Game,
  Result,
  QuizGame,
  QuizResult,
  About,
}

impl Screen {
  pub fn as_str(self) -> &'static str {
    match self {
      Screen::Home => "home",
      Screen::Difficulty => "difficulty",
      Screen::QuizDifficulty => "quiz_difficulty",
      Screen::Game => "game",
      Screen::Result => "result",
      Screen::QuizGame => "quiz_game",
      Screen::QuizResult => "quiz_result",
      Screen::About => "about",
    }
  }

  /// Menu screens can be opened directly; the others need a game.
  fn is_menu(self) -> bool {
    matches!(self, Screen::Home | Screen::Difficulty | Screen::QuizDifficulty | Screen::About)
  }
}

/// The last game started, kept for "play again".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartRequest {
  Word { tier: WordTier, options: GameOptions },
  Quiz { tier: QuizTier, options: GameOptions },
}

#[derive(Clone, Debug)]
pub enum ActiveGame {
  Word(WordSession),
  Quiz(QuizSession),
  WordDone(WordResultSummary),
  QuizDone(QuizResultSummary),
  /// The provider had nothing for the requested tier.
  NoContent,
}

/// Proof that a fetch was started at a given generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
  generation: u64,
}

/// Where a round-closing intent left the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
  Next { index: usize },
  Finished { score: u32, total: u32 },
}

#[derive(Clone, Debug)]
pub struct Player {
  generation: u64,
  screen: Screen,
  loading: bool,
  last_start: Option<StartRequest>,
  game: Option<ActiveGame>,
}

impl Default for Player {
  fn default() -> Self { Self::new() }
}

impl Player {
  pub fn new() -> Self {
    Self { generation: 0, screen: Screen::Home, loading: false, last_start: None, game: None }
  }

  pub fn screen(&self) -> Screen { self.screen }
  pub fn is_loading(&self) -> bool { self.loading }
  pub fn game(&self) -> Option<&ActiveGame> { self.game.as_ref() }
  pub fn last_start(&self) -> Option<StartRequest> { self.last_start }

  /// Open a menu screen. Any game in progress is discarded.
  pub fn navigate(&mut self, screen: Screen) -> Result<(), GameError> {
    if !screen.is_menu() {
      return Err(GameError::ForbiddenNavigation(screen.as_str()));
    }
    self.discard();
    self.screen = screen;
    Ok(())
  }

  pub fn go_home(&mut self) {
    self.discard();
    self.screen = Screen::Home;
  }

  fn discard(&mut self) {
    self.generation += 1;
    self.loading = false;
    self.game = None;
  }

  /// Enter the loading state of a new game. Whatever was running is dropped.
  pub fn begin_loading(&mut self, start: StartRequest) -> Ticket {
    self.discard();
    self.loading = true;
    self.last_start = Some(start);
    self.screen = match start {
      StartRequest::Word { .. } => Screen::Game,
      StartRequest::Quiz { .. } => Screen::QuizGame,
    };
    Ticket { generation: self.generation }
  }

  /// Install a freshly built game. Returns `false` (and changes nothing)
  /// when the player moved on since the ticket was issued.
  pub fn install(&mut self, ticket: Ticket, game: ActiveGame) -> bool {
    if ticket.generation != self.generation || !self.loading {
      return false;
    }
    self.loading = false;
    self.game = Some(game);
    true
  }

  /// Show a result that came in through a share link.
  pub fn show_shared_result(&mut self, summary: WordResultSummary) {
    self.discard();
    self.game = Some(ActiveGame::WordDone(summary));
    self.screen = Screen::Result;
  }

  fn word_session(&mut self) -> Result<&mut WordSession, GameError> {
    if self.loading {
      return Err(GameError::Loading);
    }
    match self.game.as_mut() {
      Some(ActiveGame::Word(s)) => Ok(s),
      Some(ActiveGame::Quiz(_)) => Err(GameError::WrongMode { expected: "word" }),
      Some(ActiveGame::WordDone(_)) | Some(ActiveGame::QuizDone(_)) => Err(GameError::SessionFinished),
      Some(ActiveGame::NoContent) | None => Err(GameError::NoActiveGame),
    }
  }

  fn quiz_session(&mut self) -> Result<&mut QuizSession, GameError> {
    if self.loading {
      return Err(GameError::Loading);
    }
    match self.game.as_mut() {
      Some(ActiveGame::Quiz(s)) => Ok(s),
      Some(ActiveGame::Word(_)) => Err(GameError::WrongMode { expected: "quiz" }),
      Some(ActiveGame::WordDone(_)) | Some(ActiveGame::QuizDone(_)) => Err(GameError::SessionFinished),
      Some(ActiveGame::NoContent) | None => Err(GameError::NoActiveGame),
    }
  }

  pub fn type_char(&mut self, c: char) -> Result<bool, GameError> {
    self.word_session()?.type_char(c)
  }

  pub fn backspace(&mut self) -> Result<bool, GameError> {
    self.word_session()?.backspace()
  }

  pub fn confirm_word(&mut self) -> Result<Progress, GameError> {
    let outcome = self.word_session()?.confirm()?;
    Ok(self.conclude_word(outcome))
  }

  pub fn skip_word(&mut self) -> Result<Progress, GameError> {
    let outcome = self.word_session()?.skip()?;
    Ok(self.conclude_word(outcome))
  }

  pub fn select_option(&mut self, key: OptionKey) -> Result<(), GameError> {
    self.quiz_session()?.select(key)
  }

  pub fn next_question(&mut self) -> Result<Progress, GameError> {
    let outcome = self.quiz_session()?.next()?;
    Ok(self.conclude_quiz(outcome))
  }

  pub fn skip_question(&mut self) -> Result<Progress, GameError> {
    let outcome = self.quiz_session()?.skip()?;
    Ok(self.conclude_quiz(outcome))
  }

  fn conclude_word(&mut self, outcome: RoundOutcome<WordRoundResult>) -> Progress {
    match outcome {
      RoundOutcome::Continue { next_index } => Progress::Next { index: next_index },
      RoundOutcome::Finished { score, total, results } => {
        self.game = Some(ActiveGame::WordDone(WordResultSummary::new(score, total, results)));
        self.screen = Screen::Result;
        Progress::Finished { score, total }
      }
    }
  }

  fn conclude_quiz(&mut self, outcome: RoundOutcome<QuizRoundResult>) -> Progress {
    match outcome {
      RoundOutcome::Continue { next_index } => Progress::Next { index: next_index },
      RoundOutcome::Finished { score, total, results } => {
        self.game = Some(ActiveGame::QuizDone(QuizResultSummary::new(score, total, &results)));
        self.screen = Screen::QuizResult;
        Progress::Finished { score, total }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::HidePolicy;
  use crate::rng::testing::Scripted;
  use crate::session::fixtures::{card, item};
  use pretty_assertions::assert_eq;

  fn word_start() -> StartRequest {
    StartRequest::Word { tier: WordTier::Hard, options: GameOptions::default() }
  }

  fn word_game(words: &[&str]) -> ActiveGame {
    let cards = words.iter().map(|w| card(w)).collect();
    ActiveGame::Word(WordSession::generate(cards, HidePolicy::All, 10, false, &mut Scripted::new(vec![])).unwrap())
  }

  #[test]
  fn starts_at_home() {
    let p = Player::new();
    assert_eq!(p.screen(), Screen::Home);
    assert!(p.game().is_none());
  }

  #[test]
  fn gameplay_is_rejected_while_loading() {
    let mut p = Player::new();
    p.begin_loading(word_start());
    assert_eq!(p.screen(), Screen::Game);
    assert_eq!(p.type_char('a'), Err(GameError::Loading));
  }

  #[test]
  fn stale_fetch_is_discarded() {
    let mut p = Player::new();
    let first = p.begin_loading(word_start());
    let second = p.begin_loading(StartRequest::Quiz { tier: QuizTier::Beginner, options: GameOptions::default() });
    assert!(!p.install(first, word_game(&["ATLAS"])));
    assert!(p.is_loading());
    assert!(p.install(second, ActiveGame::Quiz(QuizSession::new(vec![item("1", OptionKey::A)]).unwrap())));
    assert!(matches!(p.game(), Some(ActiveGame::Quiz(_))));
  }

  #[test]
  fn going_home_invalidates_pending_fetch() {
    let mut p = Player::new();
    let ticket = p.begin_loading(word_start());
    p.go_home();
    assert!(!p.install(ticket, word_game(&["ATLAS"])));
    assert!(p.game().is_none());
    assert_eq!(p.screen(), Screen::Home);
  }

  #[test]
  fn no_content_blocks_gameplay() {
    let mut p = Player::new();
    let ticket = p.begin_loading(word_start());
    assert!(p.install(ticket, ActiveGame::NoContent));
    assert_eq!(p.confirm_word(), Err(GameError::NoActiveGame));
  }

  #[test]
  fn finishing_a_word_game_shows_the_result() {
    let mut p = Player::new();
    let ticket = p.begin_loading(word_start());
    p.install(ticket, word_game(&["SACRO"]));
    for c in "sacro".chars() {
      p.type_char(c).unwrap();
    }
    assert_eq!(p.confirm_word(), Ok(Progress::Finished { score: 1, total: 1 }));
    assert_eq!(p.screen(), Screen::Result);
    match p.game() {
      Some(ActiveGame::WordDone(summary)) => assert!(summary.is_winner),
      other => panic!("unexpected game state {other:?}"),
    }
    assert_eq!(p.skip_word(), Err(GameError::SessionFinished));
  }

  #[test]
  fn quiz_intents_need_a_quiz() {
    let mut p = Player::new();
    let ticket = p.begin_loading(word_start());
    p.install(ticket, word_game(&["SACRO"]));
    assert_eq!(p.select_option(OptionKey::A), Err(GameError::WrongMode { expected: "quiz" }));
    assert_eq!(
      p.next_question().unwrap_err().to_string(),
      "this action belongs to the quiz game"
    );
  }

  #[test]
  fn word_intents_need_a_word_game() {
    let mut p = Player::new();
    let ticket = p.begin_loading(StartRequest::Quiz { tier: QuizTier::Beginner, options: GameOptions::default() });
    p.install(ticket, ActiveGame::Quiz(QuizSession::new(vec![item("1", OptionKey::A)]).unwrap()));
    assert_eq!(p.type_char('a'), Err(GameError::WrongMode { expected: "word" }));
    assert_eq!(p.confirm_word(), Err(GameError::WrongMode { expected: "word" }));
  }

  #[test]
  fn quiz_finishes_on_the_quiz_result_screen() {
    let mut p = Player::new();
    let ticket = p.begin_loading(StartRequest::Quiz { tier: QuizTier::Challenging, options: GameOptions::default() });
    p.install(ticket, ActiveGame::Quiz(QuizSession::new(vec![item("1", OptionKey::E)]).unwrap()));
    p.select_option(OptionKey::E).unwrap();
    assert_eq!(p.next_question(), Ok(Progress::Finished { score: 1, total: 1 }));
    assert_eq!(p.screen(), Screen::QuizResult);
  }

  #[test]
  fn only_menu_screens_are_navigable() {
    let mut p = Player::new();
    assert!(p.navigate(Screen::About).is_ok());
    assert_eq!(p.screen(), Screen::About);
    assert_eq!(p.navigate(Screen::Result), Err(GameError::ForbiddenNavigation("result")));
  }

  #[test]
  fn shared_result_opens_the_result_screen() {
    let mut p = Player::new();
    p.show_shared_result(WordResultSummary::shared(4));
    assert_eq!(p.screen(), Screen::Result);
    assert!(p.last_start().is_none());
  }
}
