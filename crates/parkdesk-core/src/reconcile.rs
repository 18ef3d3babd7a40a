use crate::events::{PushEvent, PushEventKind};
use crate::models::{ConversationKind, LocalActor, Message};
use crate::store::SyncState;

/// What one reconciled event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileResult {
    pub conversation_id: String,
    /// Ids actually inserted; empty when the event was a duplicate.
    pub inserted: Vec<String>,
}

/// Folds arriving push events into the right conversation store.
///
/// Delivery order is not guaranteed to match timestamp order under network
/// jitter, and redelivery happens; the store's timestamp-ordered,
/// id-deduplicated merge makes the timeline convergent regardless, so the
/// reconciler only has to pick the target.
pub struct EventReconciler {
    local: LocalActor,
}

impl EventReconciler {
    pub fn new(local: LocalActor) -> Self {
        Self { local }
    }

    /// Apply one event. Returns `None` when the event produced no mutation:
    /// a kind we don't handle, an unroutable message, a feed that is no
    /// longer open, or a duplicate that merged to nothing.
    pub fn reconcile(&self, state: &mut SyncState, event: PushEvent) -> Option<ReconcileResult> {
        if event.kind != PushEventKind::Added {
            tracing::debug!(kind = ?event.kind, message = %event.message.id, "ignoring unhandled event kind");
            return None;
        }

        let conversation_id = match self.route(state, &event.message) {
            Some(id) => id,
            None => {
                tracing::warn!(message = %event.message.id, "dropping unroutable event");
                return None;
            }
        };

        // Detached conversations accept no further pushes; the cached
        // timeline only changes through an explicit fetch.
        if !state.subscriptions.is_open(&conversation_id) {
            tracing::debug!(
                conversation = %conversation_id,
                message = %event.message.id,
                "dropping event for detached conversation"
            );
            return None;
        }

        let outcome = state
            .store_entry(&conversation_id)
            .insert_merge(vec![event.message]);
        if !outcome.rejected.is_empty() {
            tracing::warn!(
                conversation = %conversation_id,
                rejected = outcome.rejected.len(),
                "push event carried malformed payload"
            );
        }
        if outcome.is_noop() {
            return None;
        }

        Some(ReconcileResult {
            conversation_id,
            inserted: outcome.inserted,
        })
    }

    /// Pick the conversation an event belongs to.
    ///
    /// Group messages carry their channel id. Direct messages route by
    /// whichever side of the pair is not the local actor: for a customer
    /// that is always their own thread; for staff, a customer-authored
    /// message names its thread by sender, while the staff actor's own echo
    /// falls back to the id the feed stamped on it.
    fn route(&self, state: &SyncState, message: &Message) -> Option<String> {
        if !message.conversation_id.is_empty()
            && state.directory.kind_of(&message.conversation_id) == ConversationKind::Group
        {
            return Some(message.conversation_id.clone());
        }

        match &self.local {
            LocalActor::Customer { id } => Some(id.clone()),
            LocalActor::Staff { id, .. } => {
                if !message.is_authored_by(id) {
                    Some(message.sender_id.clone())
                } else if !message.conversation_id.is_empty() {
                    Some(message.conversation_id.clone())
                } else {
                    None
                }
            }
        }
    }
}
