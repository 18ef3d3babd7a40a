use std::collections::HashMap;

use crate::backend::SubscriptionHandle;

/// How an attach attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// A live feed was already open for this conversation; nothing was
    /// fetched or subscribed again.
    AlreadyAttached,
    /// Feed open, history merged.
    Attached { seeded: usize },
    /// Feed open, but the history fetch failed; timeline may be empty or
    /// stale until the caller retries.
    Degraded,
    /// History merged, but no live feed: either the subscription could not
    /// be opened, or a detach won the race against the fetch.
    FetchOnly { seeded: usize },
    /// Neither the feed nor the fetch succeeded.
    Unavailable,
}

/// Keyed registry of live subscriptions: conversation id → cancellation
/// handle. At most one entry per conversation, enforced by claim-before-open.
///
/// Replaces the per-screen listener re-registration the consoles used to
/// do: teardown is deterministic and screens share one feed.
pub struct SubscriptionManager {
    handles: HashMap<String, SubscriptionHandle>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    pub fn is_open(&self, conversation_id: &str) -> bool {
        self.handles.contains_key(conversation_id)
    }

    /// Register the handle for a conversation. Returns false if one is
    /// already open, dropping (and thereby cancelling) the new handle, so
    /// racing attach paths cannot double-subscribe.
    pub fn register(&mut self, conversation_id: &str, handle: SubscriptionHandle) -> bool {
        if self.handles.contains_key(conversation_id) {
            tracing::debug!(conversation = conversation_id, "duplicate subscription refused");
            return false;
        }
        self.handles.insert(conversation_id.to_string(), handle);
        true
    }

    /// Drop the live feed for a conversation. Idempotent; the removed
    /// handle cancels its registration on drop.
    pub fn detach(&mut self, conversation_id: &str) -> bool {
        match self.handles.remove(conversation_id) {
            Some(handle) => {
                handle.unsubscribe();
                true
            }
            None => false,
        }
    }

    /// Tear down every feed (session end).
    pub fn detach_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.unsubscribe();
        }
    }

    pub fn open_count(&self) -> usize {
        self.handles.len()
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
