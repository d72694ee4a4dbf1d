use axum::extract::ws::Message;
use tracing::debug;

use crate::models::{message_type, WireMessage};
use crate::sync::registry::SessionHandle;

/// Handle a PING frame with a direct PONG reply; no fanout.
pub fn handle_ping_message(doc_id: &str, session: &SessionHandle) {
    let pong = WireMessage::server(message_type::PONG, "pong");
    if !session.enqueue(Message::Text(pong.to_json())) {
        debug!("Failed to queue pong for document {}", doc_id);
    }
}
