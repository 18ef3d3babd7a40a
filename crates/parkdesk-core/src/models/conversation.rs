use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Message;
use crate::constants::OFFICIAL_SIDE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    /// One customer and the official side, as an undifferentiated counterpart.
    Direct,
    /// A staff channel with an explicit member list.
    Group,
}

/// Group metadata as supplied by the membership lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub members: Vec<String>,
}

/// One logical thread of messages. Passive data: every mutation goes through
/// the owning `ConversationStore`.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Customer id for direct threads, group id for channels.
    pub id: String,
    pub kind: ConversationKind,
    /// Display name; the customer id itself for direct threads until a
    /// richer profile is supplied.
    pub name: String,
    pub participants: HashSet<String>,
    /// Ascending by timestamp, unique by id.
    pub timeline: Vec<Message>,
    pub subscription_active: bool,
}

impl Conversation {
    pub fn direct(customer_id: impl Into<String>) -> Self {
        let id = customer_id.into();
        let participants = HashSet::from([id.clone(), OFFICIAL_SIDE.to_string()]);
        Self {
            name: id.clone(),
            id,
            kind: ConversationKind::Direct,
            participants,
            timeline: Vec::new(),
            subscription_active: false,
        }
    }

    pub fn group(group_id: impl Into<String>, info: Option<&GroupInfo>) -> Self {
        let id = group_id.into();
        let (name, participants) = match info {
            Some(info) => (info.name.clone(), info.members.iter().cloned().collect()),
            None => (id.clone(), HashSet::new()),
        };
        Self {
            id,
            kind: ConversationKind::Group,
            name,
            participants,
            timeline: Vec::new(),
            subscription_active: false,
        }
    }
}
