//! WebSocket endpoint for kitchen displays, table screens and order trackers.
//!
//! GET /ws
//!
//! Protocol (JSON text frames, `{"event": ..., "data": ...}`):
//! - Client → server: `join-table`, `join-kitchen`, `join-order-tracking`
//!   and their `leave-*` counterparts, each carrying an id.
//! - Server → client: `joined`/`left` acks, order events, `error`.
//!
//! Nothing is delivered until the client joins a topic. Memberships end with
//! the socket, so clients re-join after reconnecting.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::time::Duration;

use super::events::{ClientCommand, ServerEvent};
use super::hub::{ConnectionId, NotificationHub};
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| session(socket, hub))
}

async fn session(socket: WebSocket, hub: NotificationHub) {
    let (mut sink, mut stream) = socket.split();
    let mut subscription = hub.connect();
    let id = subscription.id;

    tracing::info!(connection = id, "realtime client connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await;

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = subscription.receiver.recv() => {
                match event {
                    Some(event) => {
                        if let Err(err) = send_event(&mut sink, &event).await {
                            tracing::debug!(connection = id, error = %err, "push failed");
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_command(&hub, id, text.as_str());
                        if let Err(err) = send_event(&mut sink, &reply).await {
                            tracing::debug!(connection = id, error = %err, "reply failed");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection = id, error = %err, "socket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    hub.disconnect(id);
    tracing::info!(connection = id, "realtime client disconnected");
}

/// Apply one client frame and build the reply for that client.
fn handle_command(hub: &NotificationHub, id: ConnectionId, raw: &str) -> ServerEvent {
    let command = match serde_json::from_str::<ClientCommand>(raw) {
        Ok(command) => command,
        Err(err) => {
            tracing::debug!(connection = id, error = %err, "invalid realtime frame");
            return ServerEvent::Error {
                message: format!("invalid frame: {err}"),
            };
        }
    };

    let (topic, join) = command.membership();
    if join {
        hub.join(id, topic);
        tracing::debug!(connection = id, topic = %topic, "joined");
        ServerEvent::Joined {
            topic: topic.to_string(),
        }
    } else {
        hub.leave(id, &topic);
        tracing::debug!(connection = id, topic = %topic, "left");
        ServerEvent::Left {
            topic: topic.to_string(),
        }
    }
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), axum::Error>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    sink.send(Message::Text(json.into())).await
}
