//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Rejected intents come back as a 4xx status with an `ErrorOut` body.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::error::GameError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

type ViewResult = Result<Json<PlayerView>, GameError>;

impl IntoResponse for GameError {
  fn into_response(self) -> Response {
    let status = match &self {
      GameError::UnknownPlayer(_) => StatusCode::NOT_FOUND,
      GameError::InvalidOption(_) | GameError::ForbiddenNavigation(_) => StatusCode::BAD_REQUEST,
      GameError::IncompleteGuess | GameError::NoSelection => StatusCode::UNPROCESSABLE_ENTITY,
      GameError::Loading
      | GameError::NoActiveGame
      | GameError::WrongMode { .. }
      | GameError::SessionFinished
      | GameError::NothingToRestart => StatusCode::CONFLICT,
    };
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_create_player(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let player_id = state.create_player().await;
  (StatusCode::CREATED, Json(PlayerOut { player_id }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_player(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::player_view(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(screen = body.screen.as_str()))]
pub async fn http_navigate(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<NavigateIn>,
) -> ViewResult {
  logic::navigate(&state, &id, body.screen).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_home(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::go_home(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(tier = body.tier.as_str()))]
pub async fn http_start_word(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<StartWordIn>,
) -> ViewResult {
  let view = logic::start_word_game(&state, &id, body.tier, body.options).await?;
  info!(target: "session", player = %id, no_content = view.no_content, "HTTP word game started");
  Ok(Json(view))
}

#[instrument(level = "info", skip(state, body), fields(tier = body.tier.as_str()))]
pub async fn http_start_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<StartQuizIn>,
) -> ViewResult {
  let view = logic::start_quiz(&state, &id, body.tier, body.options).await?;
  info!(target: "session", player = %id, no_content = view.no_content, "HTTP quiz started");
  Ok(Json(view))
}

#[instrument(level = "info", skip(state))]
pub async fn http_restart(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::restart(&state, &id).await.map(Json)
}

#[instrument(level = "debug", skip(state, body), fields(input_len = body.char.len()))]
pub async fn http_type(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<TypeIn>,
) -> ViewResult {
  logic::type_input(&state, &id, &body.char).await.map(Json)
}

#[instrument(level = "debug", skip(state))]
pub async fn http_backspace(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::backspace(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_confirm(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::confirm_word(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_skip_word(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::skip_word(&state, &id).await.map(Json)
}

#[instrument(level = "debug", skip(state, body), fields(option = %body.option))]
pub async fn http_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SelectIn>,
) -> ViewResult {
  logic::select_option(&state, &id, &body.option).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_next(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::next_question(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_skip_question(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ViewResult {
  logic::skip_question(&state, &id).await.map(Json)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_shared(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SharedIn>,
) -> ViewResult {
  logic::open_shared_result(&state, &id, &body.result).await.map(Json)
}

#[instrument(level = "info", skip(state))]
pub async fn http_about(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let info = logic::about(&state).await;
  info!(target: "osteoplay_backend", available = info.is_some(), "HTTP about served");
  Json(AboutOut { info })
}

/// Drop cached question lists and project information; the next fetch goes
/// back to the source.
#[instrument(level = "info", skip(state))]
pub async fn http_clear_cache(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  state.clear_caches().await;
  StatusCode::NO_CONTENT
}
