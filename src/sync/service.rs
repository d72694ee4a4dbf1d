use std::borrow::Cow;

use axum::extract::ws::{CloseFrame, Message};
use tracing::info;

use super::fanout;
use crate::models::{message_type, WireMessage};
use crate::state::AppState;

/// React to the metadata service deleting a document: drop the authoritative
/// cache entry and its dirty marker, tell every member, and dissolve the room.
pub async fn handle_document_deleted(state: &AppState, doc_id: &str) {
    state.cache.invalidate(doc_id);

    let notice = WireMessage::server(message_type::DOC_DELETED, "Document deleted");
    fanout::broadcast_all(&state.registry, doc_id, &notice).await;

    let evicted = state.registry.remove_room(doc_id).await;
    for member in &evicted {
        member.enqueue(Message::Close(Some(CloseFrame {
            code: 1000,
            reason: Cow::from("document deleted"),
        })));
    }
    info!(
        "Document {} deleted, closed {} session(s)",
        doc_id,
        evicted.len()
    );
}
