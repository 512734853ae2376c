//! The restricted context handed to command handlers.
//!
//! A [`CapabilityContext`] is built fresh for every invocation and dropped
//! when the handler returns. It exposes replying, the broadcast and
//! permission checks, and recursive parsing. Nothing else.

use super::dispatch::CommandDispatcher;
use crate::outbound::LineSink;

/// The room every command is reported as running in.
pub const DEFAULT_ROOM: &str = "lobby";

/// Group symbol of an unprivileged user.
pub const REGULAR_GROUP: char = ' ';

/// Capability object for one handler invocation.
pub struct CapabilityContext<'a> {
    dispatcher: &'a CommandDispatcher,
    sink: &'a mut dyn LineSink,
    sender: &'a str,
    target: &'a str,
    depth: usize,
}

impl<'a> CapabilityContext<'a> {
    pub(crate) fn new(
        dispatcher: &'a CommandDispatcher,
        sink: &'a mut dyn LineSink,
        sender: &'a str,
        target: &'a str,
        depth: usize,
    ) -> Self {
        Self {
            dispatcher,
            sink,
            sender,
            target,
            depth,
        }
    }

    /// Elevated permissions are never granted.
    pub fn can(&self, _permission: &str) -> bool {
        false
    }

    pub fn can_broadcast(&self) -> bool {
        true
    }

    /// Whether replies go to a shared channel rather than a private query.
    pub fn broadcasting(&self) -> bool {
        super::is_channel(self.target)
    }

    /// Dispatch `text` as if the same sender had typed it to the same target.
    pub fn parse(&mut self, text: &str) {
        self.dispatcher
            .dispatch_at_depth(self.sender, self.target, text, self.depth + 1, self.sink);
    }

    /// Send possibly multi-line text back to where the command came from.
    pub fn send_reply(&mut self, text: &str) {
        self.dispatcher.reply(self.target, text, self.sink);
    }

    /// Same as [`send_reply`](Self::send_reply); boxes render as plain lines.
    pub fn send_reply_box(&mut self, text: &str) {
        self.send_reply(text);
    }

    pub fn sender(&self) -> &str {
        self.sender
    }

    pub fn target(&self) -> &str {
        self.target
    }

    /// Nesting level: 0 for a line typed by a user.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Room descriptor passed to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDescriptor {
    pub id: String,
}

impl Default for RoomDescriptor {
    fn default() -> Self {
        Self {
            id: DEFAULT_ROOM.to_string(),
        }
    }
}

/// The invoking user as handlers see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDescriptor {
    pub name: String,
    pub group: char,
}

impl UserDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            group: REGULAR_GROUP,
        }
    }

    pub fn can(&self, _permission: &str) -> bool {
        false
    }

    /// Rooms are not modelled; leaving one does nothing.
    pub fn leave_room(&self, _room: &str) {}
}

/// Connection descriptor. Raw sends are swallowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionDescriptor;

impl ConnectionDescriptor {
    pub fn send(&self, _data: &str) {}
}
