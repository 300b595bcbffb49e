//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::{
  cors::{Any, CorsLayer},
  services::{ServeDir, ServeFile},
  trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - player API under `/api/v1/...`
/// - static SPA from `STATIC_DIR` (default `./static`) with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());
  let static_service = ServeDir::new(&static_dir)
    .append_index_html_on_directories(true)
    .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));

  Router::new()
    // WebSocket
    .route("/ws", get(ws::ws_upgrade))
    // HTTP API
    .route("/api/v1/health", get(http::http_health))
    .route("/api/v1/about", get(http::http_about))
    .route("/api/v1/cache/clear", post(http::http_clear_cache))
    .route("/api/v1/players", post(http::http_create_player))
    .route("/api/v1/players/:id", get(http::http_get_player))
    .route("/api/v1/players/:id/navigate", post(http::http_navigate))
    .route("/api/v1/players/:id/home", post(http::http_home))
    .route("/api/v1/players/:id/restart", post(http::http_restart))
    .route("/api/v1/players/:id/shared", post(http::http_shared))
    .route("/api/v1/players/:id/word/start", post(http::http_start_word))
    .route("/api/v1/players/:id/word/type", post(http::http_type))
    .route("/api/v1/players/:id/word/backspace", post(http::http_backspace))
    .route("/api/v1/players/:id/word/confirm", post(http::http_confirm))
    .route("/api/v1/players/:id/word/skip", post(http::http_skip_word))
    .route("/api/v1/players/:id/quiz/start", post(http::http_start_quiz))
    .route("/api/v1/players/:id/quiz/select", post(http::http_select))
    .route("/api/v1/players/:id/quiz/next", post(http::http_next))
    .route("/api/v1/players/:id/quiz/skip", post(http::http_skip_question))
    // State + CORS + HTTP tracing
    .with_state(state)
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
    // Frontend fallback
    .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
  };
  use serde_json::{json, Value};
  use tower::ServiceExt;

  fn app() -> Router {
    build_router(Arc::new(AppState::from_config(GameConfig::offline())))
  }

  async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        req = req.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
  }

  #[tokio::test]
  async fn health_is_ok() {
    let (status, body) = call(&app(), "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
  }

  #[tokio::test]
  async fn word_game_over_http() {
    let app = app();
    let (status, body) = call(&app, "POST", "/api/v1/players", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["playerId"].as_str().unwrap().to_string();

    let (status, view) = call(
      &app,
      "POST",
      &format!("/api/v1/players/{id}/word/start"),
      Some(json!({ "tier": "hard", "maxQuestions": 2, "randomize": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "game");
    assert_eq!(view["word"]["total"], 2);
    assert_eq!(view["word"]["masked"], "_ _ _ _ _");

    let (status, err) = call(&app, "POST", &format!("/api/v1/players/{id}/word/confirm"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err["error"].is_string());

    let (_, view) = call(&app, "POST", &format!("/api/v1/players/{id}/word/type"), Some(json!({ "char": "a" }))).await;
    assert_eq!(view["word"]["slots"][0]["char"], "A");

    call(&app, "POST", &format!("/api/v1/players/{id}/word/skip"), None).await;
    let (_, view) = call(&app, "POST", &format!("/api/v1/players/{id}/word/skip"), None).await;
    assert_eq!(view["screen"], "result");
    assert_eq!(view["wordResult"]["score"], 0);
    assert_eq!(view["wordResult"]["total"], 2);
  }

  #[tokio::test]
  async fn errors_map_to_status_codes() {
    let app = app();
    let (status, _) = call(&app, "GET", "/api/v1/players/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, "POST", "/api/v1/players", None).await;
    let id = body["playerId"].as_str().unwrap().to_string();
    let (status, _) =
      call(&app, "POST", &format!("/api/v1/players/{id}/navigate"), Some(json!({ "screen": "quiz_result" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, "POST", &format!("/api/v1/players/{id}/quiz/next"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn shared_link_opens_result() {
    let app = app();
    let (_, body) = call(&app, "POST", "/api/v1/players", None).await;
    let id = body["playerId"].as_str().unwrap().to_string();
    let (status, view) = call(&app, "POST", &format!("/api/v1/players/{id}/shared"), Some(json!({ "result": "7" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["screen"], "result");
    assert_eq!(view["wordResult"]["shareQuery"], "result=7");
  }

  #[tokio::test]
  async fn cache_can_be_cleared() {
    let (status, body) = call(&app(), "POST", "/api/v1/cache/clear", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
  }

  #[tokio::test]
  async fn about_without_endpoint_is_empty() {
    let (status, body) = call(&app(), "GET", "/api/v1/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "info": null }));
  }
}
