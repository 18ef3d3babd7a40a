use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{Conversation, ConversationKind};
use crate::store::{ConversationDirectory, ConversationStore};
use crate::subscriptions::SubscriptionManager;

/// Single source of truth for everything the sync core owns: one store per
/// conversation, the directory, and the live-subscription registry.
///
/// Lives behind the runtime's `Rc<RefCell<..>>`, so every screen observing a
/// conversation reads the same store instance; there are no divergent
/// copies to let unread counts drift apart.
pub struct SyncState {
    stores: HashMap<String, ConversationStore>,
    pub directory: ConversationDirectory,
    pub subscriptions: SubscriptionManager,
}

impl SyncState {
    pub fn new(directory: ConversationDirectory) -> Self {
        Self {
            stores: HashMap::new(),
            directory,
            subscriptions: SubscriptionManager::new(),
        }
    }

    pub fn store(&self, conversation_id: &str) -> Option<&ConversationStore> {
        self.stores.get(conversation_id)
    }

    pub fn store_mut(&mut self, conversation_id: &str) -> Option<&mut ConversationStore> {
        self.stores.get_mut(conversation_id)
    }

    /// Fetch the store for `conversation_id`, creating it lazily on first
    /// touch with the kind and metadata the directory knows about.
    pub fn store_entry(&mut self, conversation_id: &str) -> &mut ConversationStore {
        match self.stores.entry(conversation_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let conversation = match self.directory.kind_of(conversation_id) {
                    ConversationKind::Direct => Conversation::direct(conversation_id),
                    ConversationKind::Group => Conversation::group(
                        conversation_id,
                        self.directory.group_info(conversation_id),
                    ),
                };
                entry.insert(ConversationStore::new(conversation))
            }
        }
    }

    pub fn stores(&self) -> impl Iterator<Item = &ConversationStore> {
        self.stores.values()
    }

    pub fn stores_mut(&mut self) -> impl Iterator<Item = &mut ConversationStore> {
        self.stores.values_mut()
    }
}
