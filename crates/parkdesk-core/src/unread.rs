//! Unread counts, derived on every read.
//!
//! Counts are never stored or incremented ad hoc: a duplicated or
//! out-of-order delivery would make a maintained counter drift, while a
//! recomputed one cannot. The only write path is `mark_all_read` on the
//! store.

use crate::models::MessageStatus;
use crate::store::{ConversationStore, SyncState};

/// Messages in one conversation the local actor has not read: not authored
/// by them and not yet transitioned to read.
pub fn count_for(store: &ConversationStore, local_actor_id: &str) -> usize {
    store
        .timeline()
        .iter()
        .filter(|m| m.status != MessageStatus::Read && !m.is_authored_by(local_actor_id))
        .count()
}

/// Sum of `count_for` across the conversations the directory currently
/// tracks. Stores that exist outside the directory (events from customers
/// not yet assigned) do not contribute until the directory lists them.
pub fn aggregate(state: &SyncState, local_actor_id: &str) -> usize {
    state
        .stores()
        .filter(|store| state.directory.contains(store.id()))
        .map(|store| count_for(store, local_actor_id))
        .sum()
}
