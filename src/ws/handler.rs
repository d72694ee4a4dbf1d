use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::error::GateError;
use crate::models::{close_code, message_type, WireMessage};
use crate::state::AppState;
use crate::sync::fanout;
use crate::sync::registry::SessionHandle;
use crate::ws::msg_cursor_handler::handle_cursor_message;
use crate::ws::msg_edit_handler::handle_edit_message;
use crate::ws::msg_ping_handler::handle_ping_message;

/// Query parameters accepted on the editor handshake.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Optional bearer token from the identity service.
    pub token: Option<String>,
    /// Optional display-name override.
    pub username: Option<String>,
}

/// WebSocket entry point, one endpoint per document.
pub async fn websocket_handler(
    Path(doc_id): Path<String>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt for document {}", doc_id);
    ws.on_upgrade(move |socket| handle_socket(socket, doc_id, params, state))
}

/// Per-connection lifecycle: authorize, join the room, dispatch messages
/// until the client goes away, then leave.
async fn handle_socket(
    socket: WebSocket,
    doc_id: String,
    params: ConnectParams,
    state: Arc<AppState>,
) {
    let (mut sink, mut stream) = socket.split();

    // Authorize before the session touches any shared state
    let identity = match state
        .gate
        .authorize(&doc_id, params.token.as_deref(), params.username.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Rejected connection to document {}: {}", doc_id, e);
            let code = match e {
                GateError::PolicyViolation(_) => close_code::POLICY_VIOLATION,
                GateError::Forbidden => close_code::FORBIDDEN,
                GateError::NotFound | GateError::Store(_) => close_code::NOT_FOUND,
            };
            let _ = sink
                .send(Message::Close(Some(CloseFrame {
                    code,
                    reason: Cow::from(e.to_string()),
                })))
                .await;
            return;
        }
    };

    // The session owns a single-writer outbound queue; this task drains it
    // into the socket, so nothing else ever waits on the peer's transport.
    let (session, mut outbound_rx) = SessionHandle::new(identity.user_id, identity.username);
    let session_id = session.id;
    let username = session.username.clone();

    let mut writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let closing = matches!(frame, Message::Close(_));
            if sink.send(frame).await.is_err() {
                break;
            }
            if closing {
                break;
            }
        }
    });

    // Content for the initial sync: cache first, durable storage on miss
    let content = match state.cache.get(&doc_id) {
        Some(text) => text,
        None => match state.store.fetch_document(&doc_id).await {
            Ok(Some(doc)) => {
                state.cache.seed(&doc_id, doc.content.clone());
                doc.content
            }
            Ok(None) => String::new(),
            Err(e) => {
                error!("Failed to load document {}: {}", doc_id, e);
                session.enqueue(Message::Close(Some(CloseFrame {
                    code: close_code::NOT_FOUND,
                    reason: Cow::from("document unavailable"),
                })));
                let _ = writer_task.await;
                return;
            }
        },
    };

    let online = state.registry.join(&doc_id, session.clone()).await;
    info!("User {} joined document {}, {} online", username, doc_id, online);

    if state.config.presence_notices {
        // Tell the rest of the room, then hand the newcomer the roster
        let join_notice = WireMessage::new(message_type::USER_JOIN, username.clone(), "");
        fanout::broadcast_message(&state.registry, &doc_id, &join_notice, Some(session_id)).await;

        let mut names: Vec<String> = state
            .registry
            .members(&doc_id)
            .await
            .into_iter()
            .map(|member| member.username)
            .collect();
        names.sort();
        names.dedup();
        let roster = WireMessage::server(
            message_type::USER_LIST,
            serde_json::to_string(&names).unwrap(),
        );
        session.enqueue(Message::Text(roster.to_json()));
    }

    // One-time sync of the authoritative content
    let sync = WireMessage::server(message_type::SYNC, content);
    session.enqueue(Message::Text(sync.to_json()));

    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(raw))) => {
                        let frame: WireMessage = match serde_json::from_str(&raw) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!("Undecodable message on document {}: {}", doc_id, e);
                                continue;
                            }
                        };
                        match frame.kind.as_str() {
                            message_type::EDIT => {
                                handle_edit_message(&state, &doc_id, session_id, &raw, &frame).await;
                            }
                            message_type::CURSOR => {
                                handle_cursor_message(&state, &doc_id, session_id, &username, frame).await;
                            }
                            message_type::PING => {
                                handle_ping_message(&doc_id, &session);
                            }
                            other => {
                                debug!("Ignoring message of type {} on document {}", other, doc_id);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Transport-level binary/ping/pong frames
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("Transport error on document {}: {}", doc_id, e);
                        break;
                    }
                }
            }
            _ = &mut writer_task => {
                // Writer gone: the peer closed or the room was dissolved
                break;
            }
        }
    }

    // Leave before returning so later broadcasts never target this session
    let removed = state.registry.leave(&doc_id, session_id).await;
    if removed.is_some() {
        let remaining = state.registry.members(&doc_id).await.len();
        info!(
            "User {} left document {}, {} remaining",
            username, doc_id, remaining
        );
        if state.config.presence_notices {
            let leave_notice = WireMessage::new(message_type::USER_LEAVE, username, "");
            fanout::broadcast_message(&state.registry, &doc_id, &leave_notice, Some(session_id))
                .await;
        }
    }

    writer_task.abort();
    debug!("WebSocket connection for document {} terminated", doc_id);
}
