//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "leetclone_client", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "leetclone_client", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "leetclone_client", "WS received: {:?}", kind_of(&incoming));
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "leetclone_client", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "leetclone_client", "WebSocket disconnected");
}

/// Message name for logs; edit payloads carry user code and are not logged.
fn kind_of(msg: &ClientWsMessage) -> &'static str {
  match msg {
    ClientWsMessage::Ping => "ping",
    ClientWsMessage::GetState => "get_state",
    ClientWsMessage::SelectProblem { .. } => "select_problem",
    ClientWsMessage::SetLanguage { .. } => "set_language",
    ClientWsMessage::EditCode { .. } => "edit_code",
    ClientWsMessage::Submit => "submit",
    ClientWsMessage::Restore { .. } => "restore",
  }
}

#[instrument(level = "info", skip(msg, state), fields(kind = kind_of(&msg)))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let outcome = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::GetState => Ok(()),
    ClientWsMessage::SelectProblem { problem_id } => logic::select_problem(state, problem_id).await,
    ClientWsMessage::SetLanguage { language } => logic::set_language(state, &language).await,
    ClientWsMessage::EditCode { code } => {
      logic::edit_code(state, code).await;
      Ok(())
    }
    ClientWsMessage::Submit => logic::submit(state).await.map(|_| ()),
    ClientWsMessage::Restore { submission_id } => logic::restore(state, submission_id).await,
  };

  match outcome {
    Ok(()) => ServerWsMessage::State { view: state.view().await },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}
