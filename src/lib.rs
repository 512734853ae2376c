//! slirc-feedbot - a chat bot that relays a game feed into an IRC channel
//! and answers data lookup commands.
//!
//! - [`markup`]: feed line translation into IRC formatting
//! - [`data`]: data request lines and their summaries
//! - [`commands`]: command registry, aliases and dispatch
//! - [`scoring`]: match scoring hooks and score persistence
//! - [`bridge`]: event routing between transports and the bot
//! - [`transport`]: chat server and game feed connections

pub mod bridge;
pub mod commands;
pub mod config;
pub mod data;
pub mod dex;
pub mod error;
pub mod format;
pub mod markup;
pub mod outbound;
pub mod scoring;
pub mod telemetry;
pub mod transport;

pub use bridge::Bridge;
pub use config::Config;
