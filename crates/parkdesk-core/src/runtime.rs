use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::backend::{BackendError, ChatBackend};
use crate::config::CoreConfig;
use crate::constants::SYSTEM_SENDER;
use crate::events::PushEvent;
use crate::models::{GroupInfo, LocalActor, Message};
use crate::reconcile::{EventReconciler, ReconcileResult};
use crate::store::{ConversationDirectory, SyncState};
use crate::subscriptions::AttachOutcome;
use crate::unread;

/// Targets of a broadcast: chosen staff channels plus, optionally, every
/// direct customer thread the directory tracks.
#[derive(Debug, Clone, Default)]
pub struct BroadcastRecipients {
    pub all_customers: bool,
    pub staff_groups: Vec<String>,
}

/// The conversation-sync engine for one local actor.
///
/// Owns the shared state cell, the push-event queue, and the backend
/// handle. Everything runs on one cooperative event loop: operations are
/// non-blocking, borrows are never held across the single suspension point
/// (the history fetch), and per-conversation mutation is serialized through
/// `pump`. Screens read the shared state, never copies of it.
pub struct SyncRuntime<B: ChatBackend> {
    backend: Rc<B>,
    state: Rc<RefCell<SyncState>>,
    reconciler: EventReconciler,
    actor: LocalActor,
    event_tx: UnboundedSender<PushEvent>,
    event_rx: RefCell<UnboundedReceiver<PushEvent>>,
}

impl<B: ChatBackend> SyncRuntime<B> {
    pub fn new(config: CoreConfig, backend: B) -> Self {
        let directory = ConversationDirectory::for_actor(&config.actor, &config.group_routes);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            backend: Rc::new(backend),
            state: Rc::new(RefCell::new(SyncState::new(directory))),
            reconciler: EventReconciler::new(config.actor.clone()),
            actor: config.actor,
            event_tx,
            event_rx: RefCell::new(event_rx),
        }
    }

    pub fn actor(&self) -> &LocalActor {
        &self.actor
    }

    /// Shared state cell, for screens that render store snapshots directly.
    pub fn state(&self) -> Rc<RefCell<SyncState>> {
        self.state.clone()
    }

    /// Select a conversation: bootstrap its live timeline, then sweep it
    /// read. Queued arrivals are absorbed first so the sweep covers
    /// anything that raced the history fetch.
    pub async fn open_conversation(&self, conversation_id: &str) -> AttachOutcome {
        let outcome = self.attach(conversation_id).await;
        self.pump();
        let transitioned = self
            .state
            .borrow_mut()
            .store_entry(conversation_id)
            .mark_all_read(self.actor.id());
        if transitioned > 0 {
            tracing::debug!(
                conversation = conversation_id,
                transitioned,
                "conversation swept read on open"
            );
        }
        outcome
    }

    /// Leave a conversation's screen: drop the live feed, keep the cached
    /// timeline. Safe to call at any time, including while the bootstrap
    /// fetch is still pending.
    pub fn close_conversation(&self, conversation_id: &str) {
        let mut state = self.state.borrow_mut();
        if state.subscriptions.detach(conversation_id) {
            tracing::debug!(conversation = conversation_id, "live feed detached");
        }
        if let Some(store) = state.store_mut(conversation_id) {
            store.set_subscription_active(false);
        }
    }

    /// Bootstrap one conversation: open the live feed, then fetch history,
    /// then merge. Idempotent: a second attach while a feed is open does
    /// nothing.
    ///
    /// The feed opens before the fetch so nothing delivered inside the
    /// fetch window can be missed; the merge's dedup-by-id absorbs whatever
    /// the fetch result and the queued events both carry.
    pub async fn attach(&self, conversation_id: &str) -> AttachOutcome {
        {
            let mut state = self.state.borrow_mut();
            if state.subscriptions.is_open(conversation_id) {
                return AttachOutcome::AlreadyAttached;
            }
            state.store_entry(conversation_id);
            match self.backend.subscribe(conversation_id, self.event_tx.clone()) {
                Ok(handle) => {
                    state.subscriptions.register(conversation_id, handle);
                }
                Err(error) => {
                    tracing::warn!(
                        conversation = conversation_id,
                        %error,
                        "live feed unavailable, serving snapshot only"
                    );
                }
            }
        }

        let history = self.backend.fetch_history(conversation_id).await;

        let mut state = self.state.borrow_mut();
        // A detach may have won the race against the fetch: the late result
        // still lands in the cache, but the feed stays closed.
        let feed_open = state.subscriptions.is_open(conversation_id);
        let outcome = match history {
            Ok(messages) => {
                let merge = state.store_entry(conversation_id).insert_merge(messages);
                if !merge.rejected.is_empty() {
                    tracing::warn!(
                        conversation = conversation_id,
                        rejected = merge.rejected.len(),
                        "history carried malformed messages"
                    );
                }
                let seeded = merge.inserted.len();
                if feed_open {
                    AttachOutcome::Attached { seeded }
                } else {
                    AttachOutcome::FetchOnly { seeded }
                }
            }
            Err(error) => {
                tracing::warn!(
                    conversation = conversation_id,
                    %error,
                    "history fetch failed, timeline may be stale"
                );
                if feed_open {
                    AttachOutcome::Degraded
                } else {
                    AttachOutcome::Unavailable
                }
            }
        };
        state
            .store_entry(conversation_id)
            .set_subscription_active(feed_open);
        outcome
    }

    /// Drain every queued push event into the stores. The serialization
    /// point for all live mutation; call it from the event loop whenever
    /// the feed may have delivered.
    pub fn pump(&self) -> Vec<ReconcileResult> {
        let mut results = Vec::new();
        let mut rx = self.event_rx.borrow_mut();
        let mut state = self.state.borrow_mut();
        while let Some(event) = rx.recv().now_or_never().flatten() {
            if let Some(result) = self.reconciler.reconcile(&mut state, event) {
                results.push(result);
            }
        }
        results
    }

    /// Fire-and-forget send. No optimistic local insert: the author's copy
    /// arrives back through the live feed as a normal `added` event, and
    /// merging that echo is what commits it. On failure nothing reaches the
    /// timeline and nothing is retried here.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<(), BackendError> {
        self.backend
            .send_message(conversation_id, self.actor.id(), content)
            .await
    }

    /// Fan one system-originated message out to the selected recipients.
    /// Stops at the first send failure; echoes reconcile normally, so a
    /// double delivery cannot double-post.
    pub async fn broadcast(
        &self,
        content: &str,
        recipients: &BroadcastRecipients,
    ) -> Result<usize, BackendError> {
        let mut targets = recipients.staff_groups.clone();
        if recipients.all_customers {
            let state = self.state.borrow();
            targets.extend(state.directory.customer_ids().map(String::from));
        }
        for target in &targets {
            self.backend
                .send_message(target, SYSTEM_SENDER, content)
                .await?;
        }
        tracing::info!(recipients = targets.len(), "broadcast dispatched");
        Ok(targets.len())
    }

    // ===== Snapshots =====

    /// Read-only copy of one conversation's timeline.
    pub fn timeline_snapshot(&self, conversation_id: &str) -> Vec<Message> {
        self.state
            .borrow()
            .store(conversation_id)
            .map(|store| store.timeline().to_vec())
            .unwrap_or_default()
    }

    pub fn unread_count(&self, conversation_id: &str) -> usize {
        self.state
            .borrow()
            .store(conversation_id)
            .map(|store| unread::count_for(store, self.actor.id()))
            .unwrap_or(0)
    }

    pub fn aggregate_unread(&self) -> usize {
        unread::aggregate(&self.state.borrow(), self.actor.id())
    }

    pub fn is_subscribed(&self, conversation_id: &str) -> bool {
        self.state.borrow().subscriptions.is_open(conversation_id)
    }

    pub fn directory_ids(&self) -> Vec<String> {
        self.state.borrow().directory.ids().map(String::from).collect()
    }

    // ===== Directory maintenance =====

    /// Refresh the staff console's assigned-customer list from the
    /// membership lookup. Live stores and feeds are untouched.
    pub fn set_assigned_customers(&self, customers: Vec<String>) {
        self.state
            .borrow_mut()
            .directory
            .set_assigned_customers(customers);
    }

    pub fn set_group_info(&self, group_id: &str, info: GroupInfo) {
        self.state.borrow_mut().directory.set_group_info(group_id, info);
    }

    /// Session end: tear down every live feed. Cached timelines stay.
    pub fn shutdown(&self) {
        let mut state = self.state.borrow_mut();
        state.subscriptions.detach_all();
        for store in state.stores_mut() {
            store.set_subscription_active(false);
        }
        tracing::info!("all live feeds detached");
    }
}
