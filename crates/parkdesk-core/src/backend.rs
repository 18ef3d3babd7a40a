use std::fmt;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::events::PushEvent;
use crate::models::Message;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("history fetch failed for {conversation}: {reason}")]
    Fetch { conversation: String, reason: String },
    #[error("could not open live feed for {conversation}: {reason}")]
    Subscribe { conversation: String, reason: String },
    #[error("send failed for {conversation}: {reason}")]
    Send { conversation: String, reason: String },
}

/// Cancellation token for one live feed registration.
///
/// `unsubscribe` is idempotent; dropping the handle also cancels, so a
/// handle evicted from the registry cannot leak its callback.
pub struct SubscriptionHandle {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl SubscriptionHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    pub fn unsubscribe(&self) {
        if let Some(cancel) = self.cancel.lock().take() {
            cancel();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("cancelled", &self.cancel.lock().is_none())
            .finish()
    }
}

/// The remote side of conversation sync: one-shot history, a live push
/// feed, and fire-and-forget sends.
///
/// The author's own outgoing message is expected back through the live feed
/// as a normal `added` event; implementations own message ids and
/// timestamps.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    async fn fetch_history(&self, conversation_id: &str) -> Result<Vec<Message>, BackendError>;

    /// Register `sink` as the push-event callback for one conversation.
    /// Events must start flowing before this returns so nothing delivered
    /// while history is still in flight can be missed.
    fn subscribe(
        &self,
        conversation_id: &str,
        sink: UnboundedSender<PushEvent>,
    ) -> Result<SubscriptionHandle, BackendError>;

    async fn send_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<(), BackendError>;
}
