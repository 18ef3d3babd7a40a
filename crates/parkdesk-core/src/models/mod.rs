pub mod actor;
pub mod conversation;
pub mod message;

pub use actor::{LocalActor, StaffRole, UnknownRole};
pub use conversation::{Conversation, ConversationKind, GroupInfo};
pub use message::{MalformedMessage, Message, MessageOrigin, MessageStatus};
