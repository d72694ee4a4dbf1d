use serde::{Deserialize, Serialize};

/// Message types exchanged over the editor WebSocket.
pub mod message_type {
    /// A user edited the document; `data` carries the full replacement text.
    pub const EDIT: &str = "EDIT";

    /// Server-to-client sync of the current document content on join.
    pub const SYNC: &str = "SYNC";

    /// Cursor position relay; `data` is client-defined.
    pub const CURSOR: &str = "CURSOR";

    /// A user joined the room.
    pub const USER_JOIN: &str = "USER_JOIN";

    /// A user left the room.
    pub const USER_LEAVE: &str = "USER_LEAVE";

    /// Roster of connected display names; `data` is a JSON array.
    pub const USER_LIST: &str = "USER_LIST";

    /// Liveness probe and its reply.
    pub const PING: &str = "PING";
    pub const PONG: &str = "PONG";

    /// The document was deleted; no further messages follow for the room.
    pub const DOC_DELETED: &str = "DOC_DELETED";

    /// `sender` value on server-originated messages.
    pub const SENDER_SERVER: &str = "server";
}

/// Close codes surfaced to clients when a connection is refused.
pub mod close_code {
    /// Credential expired, malformed, or failed verification.
    pub const POLICY_VIOLATION: u16 = 1008;

    /// Authenticated but neither owner nor collaborator.
    pub const FORBIDDEN: u16 = 4403;

    /// The document id did not resolve.
    pub const NOT_FOUND: u16 = 4404;
}

/// The JSON frame exchanged with editor clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message type, one of the [`message_type`] constants.
    #[serde(rename = "type")]
    pub kind: String,

    /// Display name of the originating user, or `"server"`.
    #[serde(default)]
    pub sender: String,

    /// Type-dependent payload.
    #[serde(default)]
    pub data: String,
}

impl WireMessage {
    pub fn new(kind: &str, sender: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            sender: sender.into(),
            data: data.into(),
        }
    }

    /// A frame originated by the server rather than a peer.
    pub fn server(kind: &str, data: impl Into<String>) -> Self {
        Self::new(kind, message_type::SENDER_SERVER, data)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_round_trip() {
        let msg = WireMessage::new(message_type::EDIT, "alice", "hello world");
        let json = msg.to_json();
        assert!(json.contains(r#""type":"EDIT""#));

        let parsed: WireMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, message_type::EDIT);
        assert_eq!(parsed.sender, "alice");
        assert_eq!(parsed.data, "hello world");
    }

    #[test]
    fn missing_sender_and_data_default_to_empty() {
        let parsed: WireMessage = serde_json::from_str(r#"{"type":"PING"}"#).unwrap();
        assert_eq!(parsed.kind, message_type::PING);
        assert_eq!(parsed.sender, "");
        assert_eq!(parsed.data, "");
    }
}
