//! WebSocket endpoint for the real-time booking feed.
//!
//! Connected clients receive every event broadcast after their
//! subscription; there is no backlog or replay. A client that falls behind
//! the channel capacity skips the missed events and continues.

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// Routes:
/// - GET /events - WebSocket upgrade for the event feed
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/events", get(events_upgrade))
}

async fn events_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut events = state.broadcaster.subscribe();
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!(
        observers = state.broadcaster.receiver_count(),
        "Event feed observer connected"
    );

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event feed observer lagged; events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    tracing::debug!("Event feed observer disconnected");
}
