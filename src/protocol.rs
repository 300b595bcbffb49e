//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! The player view is the only thing the front-end renders from; it never
//! carries the answer of a word puzzle that is still being played.

use serde::{Deserialize, Serialize};

use crate::config::GameOptions;
use crate::content::ProjectInfo;
use crate::domain::{Cell, MultipleChoiceItem, OptionKey, QuizOption, QuizTier, WordTier};
use crate::player::{ActiveGame, Player, Screen};
use crate::results::{QuizResultSummary, WordResultSummary};
use crate::session::{QuizSession, WordSession};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
  Ping,
  View,
  Navigate {
    screen: Screen,
  },
  Home,
  StartWord {
    #[serde(default)]
    tier: WordTier,
    #[serde(flatten)]
    options: GameOptions,
  },
  StartQuiz {
    #[serde(default)]
    tier: QuizTier,
    #[serde(flatten)]
    options: GameOptions,
  },
  Restart,
  Type {
    char: String,
  },
  Backspace,
  Confirm,
  SkipWord,
  Select {
    option: String,
  },
  Next,
  SkipQuestion,
  SharedResult {
    result: String,
  },
  About,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
  Pong,
  View { view: PlayerView },
  About { info: Option<ProjectInfo> },
  Error { message: String },
}

/// Everything the front-end needs to draw the current screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
  pub player_id: String,
  pub screen: Screen,
  pub loading: bool,
  /// The last start found no questions for its tier.
  pub no_content: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub word: Option<WordRoundView>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quiz: Option<QuizRoundView>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub word_result: Option<WordResultSummary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quiz_result: Option<QuizResultSummary>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
  pub fixed: bool,
  pub char: Option<char>,
  /// The slot the next typed letter goes to.
  pub next: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRoundView {
  pub index: usize,
  /// 1-based, for "3 / 10" displays.
  pub position: usize,
  pub total: usize,
  pub score: u32,
  pub hint: String,
  pub image: Option<String>,
  pub masked: String,
  pub slots: Vec<SlotView>,
  pub complete: bool,
}

impl WordRoundView {
  pub fn of(session: &WordSession) -> Self {
    let puzzle = session.current();
    let guess = session.guess();
    let next = guess.next_slot();
    let slots = guess
      .mask()
      .cells()
      .iter()
      .zip(guess.slots())
      .enumerate()
      .map(|(i, (cell, ch))| SlotView { fixed: matches!(cell, Cell::Fixed(_)), char: *ch, next: next == Some(i) })
      .collect();
    Self {
      index: session.index(),
      position: session.index() + 1,
      total: session.total(),
      score: session.score(),
      hint: puzzle.hint.clone(),
      image: puzzle.image.clone(),
      masked: puzzle.mask.render(),
      slots,
      complete: guess.is_complete(),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRoundView {
  pub index: usize,
  pub position: usize,
  pub total: usize,
  pub score: u32,
  pub prompt: String,
  pub options: Vec<QuizOption>,
  pub selected: Option<OptionKey>,
  pub is_last: bool,
}

impl QuizRoundView {
  pub fn of(session: &QuizSession) -> Self {
    let item: &MultipleChoiceItem = session.current();
    Self {
      index: session.index(),
      position: session.index() + 1,
      total: session.total(),
      score: session.score(),
      prompt: item.prompt.clone(),
      options: item.options.to_vec(),
      selected: session.selected(),
      is_last: session.is_last(),
    }
  }
}

impl PlayerView {
  pub fn of(player_id: &str, player: &Player) -> Self {
    let mut view = Self {
      player_id: player_id.to_string(),
      screen: player.screen(),
      loading: player.is_loading(),
      no_content: false,
      word: None,
      quiz: None,
      word_result: None,
      quiz_result: None,
    };
    match player.game() {
      Some(ActiveGame::Word(s)) => view.word = Some(WordRoundView::of(s)),
      Some(ActiveGame::Quiz(s)) => view.quiz = Some(QuizRoundView::of(s)),
      Some(ActiveGame::WordDone(r)) => view.word_result = Some(r.clone()),
      Some(ActiveGame::QuizDone(r)) => view.quiz_result = Some(r.clone()),
      Some(ActiveGame::NoContent) => view.no_content = true,
      None => {}
    }
    view
  }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct NavigateIn {
  pub screen: Screen,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartWordIn {
  #[serde(default)]
  pub tier: WordTier,
  #[serde(flatten)]
  pub options: GameOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartQuizIn {
  #[serde(default)]
  pub tier: QuizTier,
  #[serde(flatten)]
  pub options: GameOptions,
}

#[derive(Debug, Deserialize)]
pub struct TypeIn {
  pub char: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectIn {
  pub option: String,
}

#[derive(Debug, Deserialize)]
pub struct SharedIn {
  pub result: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOut {
  pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct AboutOut {
  pub info: Option<ProjectInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
  pub ok: bool,
}
