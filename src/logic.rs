//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Every intent resolves the player, applies the change through `Player`, and
//! answers with the refreshed view. Starting a game is the only intent that
//! waits on a provider; the player lock is never held across that wait, and
//! the result is installed only if the player did not move on meanwhile.

use tracing::{debug, info, instrument};

use crate::config::GameOptions;
use crate::content::ProjectInfo;
use crate::domain::{MultipleChoiceItem, OptionKey, QuizTier, WordCard, WordTier};
use crate::error::GameError;
use crate::player::{ActiveGame, Player, Progress, Screen, StartRequest};
use crate::protocol::PlayerView;
use crate::results::{decode_shared_score, WordResultSummary};
use crate::session::{QuizSession, WordSession};
use crate::state::AppState;

pub async fn player_view(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  state.with_player(player_id, |p| Ok(PlayerView::of(player_id, p))).await
}

async fn apply<R>(
  state: &AppState,
  player_id: &str,
  f: impl FnOnce(&mut Player) -> Result<R, GameError>,
) -> Result<PlayerView, GameError> {
  state
    .with_player(player_id, |p| {
      f(p)?;
      Ok(PlayerView::of(player_id, p))
    })
    .await
}

#[instrument(level = "info", skip(state))]
pub async fn navigate(state: &AppState, player_id: &str, screen: Screen) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| p.navigate(screen)).await
}

#[instrument(level = "info", skip(state))]
pub async fn go_home(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| {
    p.go_home();
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state, options))]
pub async fn start_word_game(
  state: &AppState,
  player_id: &str,
  tier: WordTier,
  options: GameOptions,
) -> Result<PlayerView, GameError> {
  start_game(state, player_id, StartRequest::Word { tier, options }).await
}

#[instrument(level = "info", skip(state, options))]
pub async fn start_quiz(
  state: &AppState,
  player_id: &str,
  tier: QuizTier,
  options: GameOptions,
) -> Result<PlayerView, GameError> {
  start_game(state, player_id, StartRequest::Quiz { tier, options }).await
}

/// Start again with the tier and options of the last game.
#[instrument(level = "info", skip(state))]
pub async fn restart(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  let start = state.with_player(player_id, |p| p.last_start().ok_or(GameError::NothingToRestart)).await?;
  start_game(state, player_id, start).await
}

async fn start_game(state: &AppState, player_id: &str, start: StartRequest) -> Result<PlayerView, GameError> {
  let ticket = state.with_player(player_id, |p| Ok(p.begin_loading(start))).await?;

  let game = match start {
    StartRequest::Word { tier, options } => {
      let (max, randomize) = options.resolve(&state.config);
      let cards = state.words.fetch(tier.as_str()).await;
      build_word_game(cards, tier, max, randomize)
    }
    StartRequest::Quiz { tier, options } => {
      let (max, randomize) = options.resolve(&state.config);
      let items = state.quiz.fetch(tier.as_str()).await;
      build_quiz(items, max, randomize)
    }
  };

  let view = state
    .with_player(player_id, |p| {
      if p.install(ticket, game) {
        info!(target: "session", player = %player_id, screen = p.screen().as_str(), "Game ready");
      } else {
        debug!(target: "session", player = %player_id, "Discarded questions for a superseded start");
      }
      Ok(PlayerView::of(player_id, p))
    })
    .await?;
  Ok(view)
}

fn build_word_game(cards: Vec<WordCard>, tier: WordTier, max: usize, randomize: bool) -> ActiveGame {
  let mut rng = rand::thread_rng();
  match WordSession::generate(cards, tier.hide_policy(), max, randomize, &mut rng) {
    Some(session) => {
      info!(target: "session", tier = tier.as_str(), total = session.total(), "Word session generated");
      ActiveGame::Word(session)
    }
    None => ActiveGame::NoContent,
  }
}

fn build_quiz(items: Vec<MultipleChoiceItem>, max: usize, randomize: bool) -> ActiveGame {
  let mut rng = rand::thread_rng();
  match QuizSession::generate(items, max, randomize, &mut rng) {
    Some(session) => {
      info!(target: "session", total = session.total(), "Quiz session generated");
      ActiveGame::Quiz(session)
    }
    None => ActiveGame::NoContent,
  }
}

/// Type the last character of `text`. Keyboards send whole strings; only the
/// final character counts.
#[instrument(level = "debug", skip(state, text), fields(text_len = text.len()))]
pub async fn type_input(state: &AppState, player_id: &str, text: &str) -> Result<PlayerView, GameError> {
  let Some(c) = text.chars().last() else {
    return player_view(state, player_id).await;
  };
  apply(state, player_id, |p| p.type_char(c)).await
}

#[instrument(level = "debug", skip(state))]
pub async fn backspace(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| p.backspace()).await
}

#[instrument(level = "info", skip(state))]
pub async fn confirm_word(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| {
    let progress = p.confirm_word()?;
    log_progress(player_id, "confirm", progress);
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn skip_word(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| {
    let progress = p.skip_word()?;
    log_progress(player_id, "skip", progress);
    Ok(())
  })
  .await
}

#[instrument(level = "debug", skip(state))]
pub async fn select_option(state: &AppState, player_id: &str, option: &str) -> Result<PlayerView, GameError> {
  let key = OptionKey::parse(option)?;
  apply(state, player_id, |p| p.select_option(key)).await
}

#[instrument(level = "info", skip(state))]
pub async fn next_question(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| {
    let progress = p.next_question()?;
    log_progress(player_id, "next", progress);
    Ok(())
  })
  .await
}

#[instrument(level = "info", skip(state))]
pub async fn skip_question(state: &AppState, player_id: &str) -> Result<PlayerView, GameError> {
  apply(state, player_id, |p| {
    let progress = p.skip_question()?;
    log_progress(player_id, "skip", progress);
    Ok(())
  })
  .await
}

fn log_progress(player_id: &str, action: &'static str, progress: Progress) {
  match progress {
    Progress::Next { index } => debug!(target: "session", player = %player_id, action, index, "Round closed"),
    Progress::Finished { score, total } => {
      info!(target: "session", player = %player_id, action, score, total, "Session finished")
    }
  }
}

/// Open a result from a share link. Malformed scores land on the home screen.
#[instrument(level = "info", skip(state))]
pub async fn open_shared_result(state: &AppState, player_id: &str, result: &str) -> Result<PlayerView, GameError> {
  let score = decode_shared_score(result);
  apply(state, player_id, |p| {
    match score {
      Some(score) => p.show_shared_result(WordResultSummary::shared(score)),
      None => {
        debug!(target: "session", player = %player_id, "Ignoring malformed shared result");
        p.go_home();
      }
    }
    Ok(())
  })
  .await
}

pub async fn about(state: &AppState) -> Option<ProjectInfo> {
  state.project_info().await
}
