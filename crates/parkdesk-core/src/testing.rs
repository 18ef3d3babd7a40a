//! In-process fake of the remote chat backend.
//!
//! Scriptable per conversation: canned histories, gateable fetches (to hold
//! a fetch open while pushes race it), injected failures, and an optional
//! send echo that reflects outgoing messages back through the live feed the
//! way the real backend does.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use crate::backend::{BackendError, ChatBackend, SubscriptionHandle};
use crate::events::PushEvent;
use crate::models::{Message, MessageOrigin, MessageStatus};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap()
}

/// Build a well-formed wire message `secs` after the base time. Senders
/// prefixed `CUST` read as customer-side, everything else as staff-side.
pub(crate) fn wire_message(id: &str, sender: &str, secs: i64) -> Message {
    Message {
        id: id.into(),
        conversation_id: String::new(),
        sender_id: sender.into(),
        content: format!("body of {id}"),
        timestamp: Some(base_time() + Duration::seconds(secs)),
        status: MessageStatus::Sent,
        origin: if sender.starts_with("CUST") {
            MessageOrigin::Customer
        } else {
            MessageOrigin::Staff
        },
    }
}

#[derive(Default)]
struct FakeInner {
    histories: HashMap<String, Vec<Message>>,
    sinks: HashMap<String, UnboundedSender<PushEvent>>,
    fetch_gates: HashMap<String, oneshot::Receiver<()>>,
    fail_fetch: HashSet<String>,
    fail_subscribe: HashSet<String>,
    fail_send: HashSet<String>,
    call_log: Vec<String>,
    sent: Vec<(String, String, String)>,
    echo_on_send: bool,
    echo_clock: i64,
}

#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(self, conversation: &str, messages: Vec<Message>) -> Self {
        self.inner
            .lock()
            .histories
            .insert(conversation.into(), messages);
        self
    }

    /// Hold the next fetch for `conversation` open until the returned sender
    /// fires (or is dropped).
    pub fn gate_next_fetch(&self, conversation: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().fetch_gates.insert(conversation.into(), rx);
        tx
    }

    pub fn fail_fetch(&self, conversation: &str) {
        self.inner.lock().fail_fetch.insert(conversation.into());
    }

    pub fn fail_subscribe(&self, conversation: &str) {
        self.inner.lock().fail_subscribe.insert(conversation.into());
    }

    pub fn fail_send(&self, conversation: &str) {
        self.inner.lock().fail_send.insert(conversation.into());
    }

    /// Reflect each accepted send back through the conversation's live feed
    /// as an `added` event, the way the production backend does.
    pub fn enable_echo(&self) {
        self.inner.lock().echo_on_send = true;
    }

    /// Deliver a push event to the conversation's live feed. Returns false
    /// when no feed is registered (post-detach, or never subscribed).
    pub fn push(&self, conversation: &str, event: PushEvent) -> bool {
        let inner = self.inner.lock();
        match inner.sinks.get(conversation) {
            Some(sink) => sink.send(event).is_ok(),
            None => false,
        }
    }

    pub fn has_live_sink(&self, conversation: &str) -> bool {
        self.inner.lock().sinks.contains_key(conversation)
    }

    /// Interleaved `subscribe:<id>` / `fetch:<id>` / `send:<id>` entries,
    /// in call order.
    pub fn call_log(&self) -> Vec<String> {
        self.inner.lock().call_log.clone()
    }

    pub fn fetch_count(&self, conversation: &str) -> usize {
        self.count_calls(&format!("fetch:{conversation}"))
    }

    pub fn subscribe_count(&self, conversation: &str) -> usize {
        self.count_calls(&format!("subscribe:{conversation}"))
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.inner.lock().sent.clone()
    }

    fn count_calls(&self, entry: &str) -> usize {
        self.inner
            .lock()
            .call_log
            .iter()
            .filter(|logged| logged.as_str() == entry)
            .count()
    }
}

impl ChatBackend for FakeBackend {
    async fn fetch_history(&self, conversation_id: &str) -> Result<Vec<Message>, BackendError> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.call_log.push(format!("fetch:{conversation_id}"));
            inner.fetch_gates.remove(conversation_id)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let inner = self.inner.lock();
        if inner.fail_fetch.contains(conversation_id) {
            return Err(BackendError::Fetch {
                conversation: conversation_id.into(),
                reason: "scripted outage".into(),
            });
        }
        Ok(inner
            .histories
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    fn subscribe(
        &self,
        conversation_id: &str,
        sink: UnboundedSender<PushEvent>,
    ) -> Result<SubscriptionHandle, BackendError> {
        let mut inner = self.inner.lock();
        inner.call_log.push(format!("subscribe:{conversation_id}"));
        if inner.fail_subscribe.contains(conversation_id) {
            return Err(BackendError::Subscribe {
                conversation: conversation_id.into(),
                reason: "scripted outage".into(),
            });
        }
        inner.sinks.insert(conversation_id.to_string(), sink);

        let weak = Arc::downgrade(&self.inner);
        let registered = conversation_id.to_string();
        Ok(SubscriptionHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().sinks.remove(&registered);
            }
        }))
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.lock();
        inner.call_log.push(format!("send:{conversation_id}"));
        if inner.fail_send.contains(conversation_id) {
            return Err(BackendError::Send {
                conversation: conversation_id.into(),
                reason: "scripted outage".into(),
            });
        }
        inner
            .sent
            .push((conversation_id.into(), sender_id.into(), content.into()));

        if inner.echo_on_send {
            inner.echo_clock += 1;
            let mut echoed = wire_message(
                &format!("MSG-{}", uuid::Uuid::new_v4()),
                sender_id,
                3600 + inner.echo_clock,
            );
            echoed.conversation_id = conversation_id.into();
            echoed.content = content.into();
            if let Some(sink) = inner.sinks.get(conversation_id) {
                let _ = sink.send(PushEvent::added(echoed));
            }
        }
        Ok(())
    }
}
