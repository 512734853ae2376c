//! Chat commands.
//!
//! - [`registry`]: command names, aliases and resolution
//! - [`context`]: the capability object handlers receive
//! - [`dispatch`]: line parsing and invocation
//! - [`builtin`]: the commands the bot ships with

pub mod builtin;
pub mod context;
pub mod dispatch;
pub mod registry;

pub use context::{CapabilityContext, ConnectionDescriptor, RoomDescriptor, UserDescriptor};
pub use dispatch::CommandDispatcher;
pub use registry::{CommandHandler, CommandRegistry, RegistryBuilder, Resolved, Step};

/// An inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: String,
    /// Channel name or the bot's own nick for private messages.
    pub target: String,
    pub text: String,
}

impl ChatLine {
    pub fn new(sender: &str, target: &str, text: &str) -> Self {
        Self {
            sender: sender.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        }
    }
}

/// Channel names start with `#` or `&`.
pub fn is_channel(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}
