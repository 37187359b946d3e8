// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live exercise overview over WebSocket.
//!
//! The server pushes a full `snapshot` on connect, after every change to
//! the user's entries, and whenever the client changes its filter. Each
//! snapshot is rebuilt from a fresh read of the user's entries.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::routes::api::{load_overview, validate_query, ExercisesQuery, ExercisesResponse};
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Extension, Router,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stream", get(stream_handler))
}

/// Messages sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Snapshot(ExercisesResponse),
    /// Transient failure; the client should keep showing its last snapshot.
    Error { message: String },
}

/// Messages accepted from the client.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Replace the filter text; an empty query shows everything.
    Filter {
        #[serde(default)]
        query: String,
    },
}

/// WebSocket upgrade handler.
async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ExercisesQuery>,
) -> Result<Response> {
    validate_query(params.q.as_deref())?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user, params.q)))
}

/// Drive one connection until either side goes away.
async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user: AuthUser,
    mut query: Option<String>,
) {
    let mut changes = state.snapshots.subscribe(&user.uid);
    let (mut sender, mut receiver) = socket.split();

    tracing::info!(uid = %user.uid, "Entry stream opened");

    if send_snapshot(&mut sender, &state, &user.uid, query.as_deref())
        .await
        .is_ok()
    {
        loop {
            tokio::select! {
                event = changes.recv() => match event {
                    // A lagged receiver still only needs one fresh snapshot.
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        if send_snapshot(&mut sender, &state, &user.uid, query.as_deref())
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                },
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match parse_client_message(text.as_str()) {
                            Ok(ClientMessage::Filter { query: new_query }) => {
                                query = (!new_query.is_empty()).then_some(new_query);
                                None
                            }
                            Err(message) => Some(ServerMessage::Error { message }),
                        };

                        let sent = match reply {
                            Some(error) => send_message(&mut sender, &error).await,
                            None => {
                                send_snapshot(&mut sender, &state, &user.uid, query.as_deref())
                                    .await
                            }
                        };
                        if sent.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(uid = %user.uid, error = %e, "WebSocket receive error");
                        break;
                    }
                },
            }
        }
    }

    drop(changes);
    state.snapshots.prune(&user.uid);
    tracing::info!(uid = %user.uid, "Entry stream closed");
}

/// Parse and validate a client message, returning a user-facing error.
fn parse_client_message(text: &str) -> std::result::Result<ClientMessage, String> {
    let message: ClientMessage = serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "Unrecognized stream message");
        "Unrecognized message".to_string()
    })?;

    let ClientMessage::Filter { query } = &message;
    validate_query(Some(query)).map_err(|e| e.to_string())?;

    Ok(message)
}

/// Rebuild the overview and push it. Load failures are reported to the
/// client without closing the stream.
async fn send_snapshot(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
    uid: &str,
    query: Option<&str>,
) -> std::result::Result<(), axum::Error> {
    let message = match load_overview(state, uid, query).await {
        Ok(overview) => ServerMessage::Snapshot(overview),
        Err(e) => {
            tracing::warn!(uid, error = %e, "Failed to load entry snapshot");
            let (_, code) = e.status_and_code();
            ServerMessage::Error {
                message: code.to_string(),
            }
        }
    };

    send_message(sender, &message).await
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize stream message");
            Ok(())
        }
    }
}
