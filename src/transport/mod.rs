//! Network transport: the chat server connection and the game feed.

pub mod client;
pub mod line;

pub use client::{FeedReader, IrcClient};
pub use line::{Command, IrcEvent, RawMessage};
