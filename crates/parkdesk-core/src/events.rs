use serde::{Deserialize, Serialize};

use crate::models::Message;

/// What a push event announces about its message.
///
/// Only `Added` mutates a timeline. The wire format admits other kinds;
/// they all deserialize to `Other` and are ignored downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PushEventKind {
    Added,
    Other,
}

impl From<String> for PushEventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "added" => Self::Added,
            _ => Self::Other,
        }
    }
}

impl From<PushEventKind> for String {
    fn from(kind: PushEventKind) -> Self {
        match kind {
            PushEventKind::Added => "added",
            PushEventKind::Other => "other",
        }
        .to_string()
    }
}

/// One asynchronously delivered notification from the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "type")]
    pub kind: PushEventKind,
    pub message: Message,
}

impl PushEvent {
    pub fn added(message: Message) -> Self {
        Self {
            kind: PushEventKind::Added,
            message,
        }
    }
}
