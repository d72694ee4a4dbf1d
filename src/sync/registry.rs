use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub type SessionId = Uuid;

/// One live editor connection, as tracked by the room registry.
///
/// The handle owns the sending half of the connection's outbound queue; a
/// dedicated writer task drains the receiving half into the socket, so
/// enqueueing a frame never awaits the peer's transport.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    pub user_id: Option<i64>,
    pub username: String,
    outbound: UnboundedSender<Message>,
}

impl SessionHandle {
    pub fn new(
        user_id: Option<i64>,
        username: impl Into<String>,
    ) -> (Self, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            id: Uuid::new_v4(),
            user_id,
            username: username.into(),
            outbound: tx,
        };
        (handle, rx)
    }

    /// Enqueue a frame on this session's outbound queue.
    ///
    /// Returns false when the writer task has already gone away.
    pub fn enqueue(&self, message: Message) -> bool {
        self.outbound.send(message).is_ok()
    }
}

/// Live rooms, one per document id with at least one member.
///
/// Membership changes hold the map write lock briefly; snapshots for fanout
/// and rosters only read, so message traffic on unrelated documents proceeds
/// concurrently.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, HashMap<SessionId, SessionHandle>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Add a session to the room for `doc_id`, creating the room if absent.
    /// Returns the member count after joining.
    pub async fn join(&self, doc_id: &str, session: SessionHandle) -> usize {
        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(doc_id.to_string()).or_default();
        room.insert(session.id, session);
        room.len()
    }

    /// Remove a session from the room for `doc_id`, dropping the room entry
    /// when it becomes empty. Leaving a session that is not a member is a
    /// no-op.
    pub async fn leave(&self, doc_id: &str, session_id: SessionId) -> Option<SessionHandle> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(doc_id)?;
        let removed = room.remove(&session_id);
        if room.is_empty() {
            rooms.remove(doc_id);
            debug!("Room for document {} is empty, removed", doc_id);
        }
        removed
    }

    /// Snapshot of the sessions currently in the room for `doc_id`.
    pub async fn members(&self, doc_id: &str) -> Vec<SessionHandle> {
        self.rooms
            .read()
            .await
            .get(doc_id)
            .map(|room| room.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove the whole room and return the evicted sessions. Used when a
    /// document is deleted and every member must be disconnected.
    pub async fn remove_room(&self, doc_id: &str) -> Vec<SessionHandle> {
        self.rooms
            .write()
            .await
            .remove(doc_id)
            .map(|room| room.into_values().collect())
            .unwrap_or_default()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.rooms.read().await.values().map(|room| room.len()).sum()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn session(name: &str) -> SessionHandle {
        SessionHandle::new(None, name).0
    }

    #[tokio::test]
    async fn members_tracks_joins_and_leaves() {
        let registry = RoomRegistry::new();
        let a = session("a");
        let b = session("b");

        registry.join("d1", a.clone()).await;
        registry.join("d1", b.clone()).await;
        assert_eq!(registry.members("d1").await.len(), 2);

        registry.leave("d1", a.id).await;
        let remaining = registry.members("d1").await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[tokio::test]
    async fn empty_room_is_removed_immediately() {
        let registry = RoomRegistry::new();
        let a = session("a");

        registry.join("d1", a.clone()).await;
        assert_eq!(registry.room_count().await, 1);

        registry.leave("d1", a.id).await;
        assert_eq!(registry.room_count().await, 0);
        assert!(registry.members("d1").await.is_empty());
    }

    #[tokio::test]
    async fn leave_is_idempotent() {
        let registry = RoomRegistry::new();
        let a = session("a");
        let b = session("b");

        registry.join("d1", a.clone()).await;
        registry.join("d1", b.clone()).await;

        assert!(registry.leave("d1", a.id).await.is_some());
        assert!(registry.leave("d1", a.id).await.is_none());
        // Leaving a session that never joined is also a no-op
        assert!(registry.leave("d1", session("c").id).await.is_none());
        assert_eq!(registry.members("d1").await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_joins_land_in_one_room() {
        let registry = Arc::new(RoomRegistry::new());

        let mut tasks = Vec::new();
        for i in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.join("d1", session(&format!("u{i}"))).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.room_count().await, 1);
        assert_eq!(registry.members("d1").await.len(), 32);
        assert_eq!(registry.connection_count().await, 32);
    }

    #[tokio::test]
    async fn rooms_are_independent_per_document() {
        let registry = RoomRegistry::new();
        let a = session("a");
        let b = session("b");

        registry.join("d1", a.clone()).await;
        registry.join("d2", b.clone()).await;
        assert_eq!(registry.room_count().await, 2);

        registry.leave("d1", a.id).await;
        assert_eq!(registry.room_count().await, 1);
        assert_eq!(registry.members("d2").await.len(), 1);
    }

    #[tokio::test]
    async fn remove_room_evicts_all_members() {
        let registry = RoomRegistry::new();
        let a = session("a");
        let b = session("b");
        registry.join("d1", a).await;
        registry.join("d1", b).await;

        let evicted = registry.remove_room("d1").await;
        assert_eq!(evicted.len(), 2);
        assert_eq!(registry.room_count().await, 0);
        assert!(registry.remove_room("d1").await.is_empty());
    }
}
