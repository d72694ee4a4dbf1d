use tracing::debug;

use crate::models::WireMessage;
use crate::state::AppState;
use crate::sync::fanout;
use crate::sync::registry::SessionId;

/// Handle a CURSOR frame: stamp the sender's display name and relay.
///
/// Cursor positions are transient, so there is no cache write.
pub async fn handle_cursor_message(
    state: &AppState,
    doc_id: &str,
    sender: SessionId,
    username: &str,
    mut frame: WireMessage,
) {
    if !state.config.cursor_relay {
        debug!("Cursor relay disabled, dropping frame for document {}", doc_id);
        return;
    }

    frame.sender = username.to_string();
    fanout::broadcast_message(&state.registry, doc_id, &frame, Some(sender)).await;
}
