pub mod backend;
pub mod config;
pub mod constants;
pub mod events;
pub mod models;
pub mod reconcile;
pub mod runtime;
pub mod store;
pub mod subscriptions;
pub mod tracing_setup;
pub mod unread;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the surface screens actually touch.
pub use backend::{BackendError, ChatBackend, SubscriptionHandle};
pub use config::{CoreConfig, GroupRoutes};
pub use events::{PushEvent, PushEventKind};
pub use models::{
    Conversation, ConversationKind, GroupInfo, LocalActor, MalformedMessage, Message,
    MessageOrigin, MessageStatus, StaffRole, UnknownRole,
};
pub use reconcile::ReconcileResult;
pub use runtime::{BroadcastRecipients, SyncRuntime};
pub use store::{ConversationDirectory, ConversationStore, MergeOutcome, SyncState};
pub use subscriptions::AttachOutcome;
