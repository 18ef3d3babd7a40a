use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of a message as the local actor sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Read,
}

/// Which side of the venue produced a message.
///
/// Drives bubble layout and unread attribution on the screens, never
/// ownership: ownership is always decided by `sender_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    Customer,
    /// Staff-side senders: support consoles, division staff, broadcasts.
    #[serde(alias = "maintenance", alias = "broadcast", alias = "system")]
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Opaque stable id, unique within a conversation (`MSG-<uuid>` on the
    /// wire).
    #[serde(rename = "message_id")]
    pub id: String,
    /// Owning conversation. Not carried on the wire (implied by the feed a
    /// message arrives on); canonicalized by the store on insert.
    #[serde(default, skip_serializing)]
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    /// Origin time, the total order key for timelines. `None` when the wire
    /// payload omitted it; such messages never pass `insert_merge`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub status: MessageStatus,
    #[serde(rename = "type")]
    pub origin: MessageOrigin,
}

/// Why a message was refused at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedMessage {
    #[error("message is missing an id")]
    MissingId,
    #[error("message {0} is missing a timestamp")]
    MissingTimestamp(String),
}

impl Message {
    /// Check the fields dedup and ordering depend on. Anything else is
    /// carried as-is.
    pub fn validate(&self) -> Result<(), MalformedMessage> {
        if self.id.is_empty() {
            return Err(MalformedMessage::MissingId);
        }
        if self.timestamp.is_none() {
            return Err(MalformedMessage::MissingTimestamp(self.id.clone()));
        }
        Ok(())
    }

    pub fn is_authored_by(&self, actor_id: &str) -> bool {
        self.sender_id == actor_id
    }
}
