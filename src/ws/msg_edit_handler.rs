use tracing::debug;

use crate::models::WireMessage;
use crate::state::AppState;
use crate::sync::fanout;
use crate::sync::registry::SessionId;

/// Handle an EDIT frame.
///
/// The full replacement text becomes the authoritative content, the document
/// is marked for the next flush, and the frame is relayed unchanged to every
/// other room member.
pub async fn handle_edit_message(
    state: &AppState,
    doc_id: &str,
    sender: SessionId,
    raw: &str,
    frame: &WireMessage,
) {
    debug!(
        "Edit on document {} from session {} ({} bytes)",
        doc_id,
        sender,
        frame.data.len()
    );

    state.cache.set(doc_id, frame.data.clone());
    fanout::broadcast(&state.registry, doc_id, raw, Some(sender)).await;
}
