use std::collections::HashSet;

use crate::models::{Conversation, MalformedMessage, Message, MessageStatus};

/// What `insert_merge` did with a batch.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Ids of messages that were actually inserted, in insertion order.
    pub inserted: Vec<String>,
    /// Inputs refused at the boundary; nothing of theirs entered the
    /// timeline.
    pub rejected: Vec<MalformedMessage>,
}

impl MergeOutcome {
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty() && self.rejected.is_empty()
    }
}

/// Canonical holder of one conversation's timeline and metadata.
///
/// All mutation passes through here, which is what keeps the timeline
/// invariants (unique by id, non-decreasing by timestamp) observable at
/// every point outside a merge.
#[derive(Debug)]
pub struct ConversationStore {
    conversation: Conversation,
    /// Id index over `conversation.timeline`; dedup and ordered insert are
    /// one step.
    seen_ids: HashSet<String>,
}

impl ConversationStore {
    pub fn new(conversation: Conversation) -> Self {
        let seen_ids = conversation
            .timeline
            .iter()
            .map(|m| m.id.clone())
            .collect();
        Self {
            conversation,
            seen_ids,
        }
    }

    pub fn id(&self) -> &str {
        &self.conversation.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn timeline(&self) -> &[Message] {
        &self.conversation.timeline
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.seen_ids.contains(message_id)
    }

    pub fn subscription_active(&self) -> bool {
        self.conversation.subscription_active
    }

    pub fn set_subscription_active(&mut self, active: bool) {
        self.conversation.subscription_active = active;
    }

    /// Merge `incoming` into the timeline.
    ///
    /// A message whose id is already present is left untouched (presence is
    /// all that matters; content is never overwritten). New messages land at
    /// the first position whose existing timestamp is strictly greater, so
    /// equal timestamps keep arrival order. Malformed inputs are reported
    /// back, never inserted.
    pub fn insert_merge(&mut self, incoming: Vec<Message>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for mut message in incoming {
            if let Err(reason) = message.validate() {
                tracing::warn!(
                    conversation = %self.conversation.id,
                    %reason,
                    "refusing malformed message"
                );
                outcome.rejected.push(reason);
                continue;
            }
            if self.seen_ids.contains(&message.id) {
                continue;
            }
            if message.conversation_id.is_empty() {
                message.conversation_id = self.conversation.id.clone();
            }

            let ts = message.timestamp;
            let pos = self
                .conversation
                .timeline
                .partition_point(|existing| existing.timestamp <= ts);
            self.seen_ids.insert(message.id.clone());
            outcome.inserted.push(message.id.clone());
            self.conversation.timeline.insert(pos, message);
        }

        outcome
    }

    /// Transition every message not authored by `local_actor_id` to read.
    /// Returns how many messages changed state.
    ///
    /// Inserts cannot interleave with the sweep: the store lives behind the
    /// runtime's single-threaded cell, so the transition is atomic as
    /// observed by any caller.
    pub fn mark_all_read(&mut self, local_actor_id: &str) -> usize {
        let mut transitioned = 0;
        for message in &mut self.conversation.timeline {
            if message.status != MessageStatus::Read && !message.is_authored_by(local_actor_id) {
                message.status = MessageStatus::Read;
                transitioned += 1;
            }
        }
        transitioned
    }
}
