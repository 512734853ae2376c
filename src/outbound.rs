//! Outbound chat lines.
//!
//! Everything the bot says goes through a [`LineSink`]. The [`Outbox`] sink
//! buffers lines so a whole inbound event can be processed before anything
//! is written to the socket.

use crate::format::collapse_spaces;

/// One line to send to a channel or nick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLine {
    pub target: String,
    pub text: String,
}

/// Destination for outbound chat lines.
pub trait LineSink {
    fn send(&mut self, target: &str, text: &str);
}

/// Buffering sink.
///
/// Collapses space runs the way the chat transport expects and drops lines
/// that end up empty.
#[derive(Debug, Default)]
pub struct Outbox {
    lines: Vec<OutboundLine>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OutboundLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Take every buffered line, oldest first.
    pub fn drain(&mut self) -> Vec<OutboundLine> {
        std::mem::take(&mut self.lines)
    }

    /// Texts only, for assertions.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

impl LineSink for Outbox {
    fn send(&mut self, target: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        self.lines.push(OutboundLine {
            target: target.to_string(),
            text: collapse_spaces(text).into_owned(),
        });
    }
}
