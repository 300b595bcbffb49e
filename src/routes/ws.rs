//! WebSocket upgrade + message loop. Each connection gets its own player,
//! dropped again when the socket closes. Every client message gets exactly
//! one JSON reply: the refreshed view, the about text, or an error.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::error::GameError;
use crate::logic;
use crate::protocol::{ClientWsMessage, PlayerView, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "osteoplay_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let player_id = state.create_player().await;
  info!(target: "osteoplay_backend", player = %player_id, "WebSocket connected");

  // Greet with the initial view so the client can render the home screen.
  let greeting = view_reply(logic::player_view(&state, &player_id).await);
  if send(&mut socket, &greeting).await {
    while let Some(Ok(msg)) = socket.recv().await {
      match msg {
        Message::Text(txt) => {
          let reply = match serde_json::from_str::<ClientWsMessage>(&txt) {
            Ok(incoming) => {
              debug!(target: "osteoplay_backend", player = %player_id, "WS received: {:?}", &incoming);
              handle_client_ws(incoming, &state, &player_id).await
            }
            Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
          };
          if !send(&mut socket, &reply).await {
            break;
          }
        }
        Message::Ping(payload) => {
          let _ = socket.send(Message::Pong(payload)).await;
        }
        Message::Close(_) => break,
        _ => {}
      }
    }
  }

  state.remove_player(&player_id).await;
  info!(target: "osteoplay_backend", player = %player_id, "WebSocket disconnected");
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> bool {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  match socket.send(Message::Text(out)).await {
    Ok(()) => true,
    Err(e) => {
      error!(target: "osteoplay_backend", error = %e, "WS send error");
      false
    }
  }
}

fn view_reply(result: Result<PlayerView, GameError>) -> ServerWsMessage {
  match result {
    Ok(view) => ServerWsMessage::View { view },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state, msg))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, player_id: &str) -> ServerWsMessage {
  let result = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::About => return ServerWsMessage::About { info: logic::about(state).await },
    ClientWsMessage::View => logic::player_view(state, player_id).await,
    ClientWsMessage::Navigate { screen } => logic::navigate(state, player_id, screen).await,
    ClientWsMessage::Home => logic::go_home(state, player_id).await,
    ClientWsMessage::StartWord { tier, options } => logic::start_word_game(state, player_id, tier, options).await,
    ClientWsMessage::StartQuiz { tier, options } => logic::start_quiz(state, player_id, tier, options).await,
    ClientWsMessage::Restart => logic::restart(state, player_id).await,
    ClientWsMessage::Type { char } => logic::type_input(state, player_id, &char).await,
    ClientWsMessage::Backspace => logic::backspace(state, player_id).await,
    ClientWsMessage::Confirm => logic::confirm_word(state, player_id).await,
    ClientWsMessage::SkipWord => logic::skip_word(state, player_id).await,
    ClientWsMessage::Select { option } => logic::select_option(state, player_id, &option).await,
    ClientWsMessage::Next => logic::next_question(state, player_id).await,
    ClientWsMessage::SkipQuestion => logic::skip_question(state, player_id).await,
    ClientWsMessage::SharedResult { result } => logic::open_shared_result(state, player_id, &result).await,
  };
  view_reply(result)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use crate::player::Screen;

  #[tokio::test]
  async fn ws_messages_drive_the_player() {
    let state = AppState::from_config(GameConfig::offline());
    let id = state.create_player().await;

    let reply = handle_client_ws(ClientWsMessage::Ping, &state, &id).await;
    assert!(matches!(reply, ServerWsMessage::Pong));

    let reply = handle_client_ws(ClientWsMessage::Navigate { screen: Screen::Difficulty }, &state, &id).await;
    match reply {
      ServerWsMessage::View { view } => assert_eq!(view.screen, Screen::Difficulty),
      other => panic!("unexpected {other:?}"),
    }

    let reply = handle_client_ws(ClientWsMessage::Confirm, &state, &id).await;
    match reply {
      ServerWsMessage::Error { message } => assert_eq!(message, GameError::NoActiveGame.to_string()),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn reply_serializes_with_type_tag() {
    let json = serde_json::to_value(ServerWsMessage::Error { message: "x".into() }).unwrap();
    assert_eq!(json["type"], "error");
    assert_eq!(json["message"], "x");
  }
}
