use axum::extract::ws::Message;
use tracing::warn;

use super::registry::{RoomRegistry, SessionId};
use crate::models::WireMessage;

/// Deliver `payload` to every member of the room for `doc_id`, excluding
/// `exclude` (usually the originator).
///
/// Delivery is an enqueue on each recipient's outbound queue; a recipient
/// whose writer has gone away is logged and skipped, never aborting the rest.
pub async fn broadcast(
    registry: &RoomRegistry,
    doc_id: &str,
    payload: &str,
    exclude: Option<SessionId>,
) {
    for member in registry.members(doc_id).await {
        if Some(member.id) == exclude {
            continue;
        }
        if !member.enqueue(Message::Text(payload.to_string())) {
            warn!(
                "Dropping frame for closed session {} on document {}",
                member.id, doc_id
            );
        }
    }
}

/// Serialize and deliver `message`, excluding `exclude`.
pub async fn broadcast_message(
    registry: &RoomRegistry,
    doc_id: &str,
    message: &WireMessage,
    exclude: Option<SessionId>,
) {
    broadcast(registry, doc_id, &message.to_json(), exclude).await;
}

/// Serialize and deliver `message` to every member with no exclusion.
pub async fn broadcast_all(registry: &RoomRegistry, doc_id: &str, message: &WireMessage) {
    broadcast(registry, doc_id, &message.to_json(), None).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message_type;
    use crate::sync::registry::SessionHandle;

    #[tokio::test]
    async fn broadcast_skips_the_sender() {
        let registry = RoomRegistry::new();
        let (a, mut a_rx) = SessionHandle::new(None, "a");
        let (b, mut b_rx) = SessionHandle::new(None, "b");
        registry.join("d1", a.clone()).await;
        registry.join("d1", b.clone()).await;

        let edit = WireMessage::new(message_type::EDIT, "a", "hello");
        broadcast_message(&registry, "d1", &edit, Some(a.id)).await;

        let frame = b_rx.recv().await.unwrap();
        match frame {
            Message::Text(text) => {
                let parsed: WireMessage = serde_json::from_str(&text).unwrap();
                assert_eq!(parsed.data, "hello");
            }
            other => panic!("unexpected frame {other:?}"),
        }
        assert!(a_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_all_reaches_everyone() {
        let registry = RoomRegistry::new();
        let (a, mut a_rx) = SessionHandle::new(None, "a");
        let (b, mut b_rx) = SessionHandle::new(None, "b");
        registry.join("d1", a).await;
        registry.join("d1", b).await;

        let notice = WireMessage::server(message_type::DOC_DELETED, "Document deleted");
        broadcast_all(&registry, "d1", &notice).await;

        assert!(a_rx.recv().await.is_some());
        assert!(b_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn closed_recipient_does_not_abort_delivery() {
        let registry = RoomRegistry::new();
        let (a, a_rx) = SessionHandle::new(None, "a");
        let (b, mut b_rx) = SessionHandle::new(None, "b");
        registry.join("d1", a).await;
        registry.join("d1", b).await;
        drop(a_rx); // a's writer is gone

        let edit = WireMessage::new(message_type::EDIT, "c", "v1");
        broadcast_message(&registry, "d1", &edit, None).await;

        assert!(b_rx.recv().await.is_some());
    }
}
