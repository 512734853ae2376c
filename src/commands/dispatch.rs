//! Chat line parsing and command dispatch.

use super::context::{CapabilityContext, ConnectionDescriptor, RoomDescriptor, UserDescriptor};
use super::registry::CommandRegistry;
use super::{ChatLine, is_channel};
use crate::config::CommandsConfig;
use crate::data::{DataLookupDispatcher, is_data_request};
use crate::markup::{split_lines, strip_raw};
use crate::outbound::LineSink;
use crate::telemetry::{CommandTimer, spans};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `!name args` or `/name args`.
static COMMAND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[!/]([A-Za-z0-9_]+)\s*(.*)")
        .unwrap_or_else(|e| panic!("bad command pattern: {e}"))
});

/// Fixed reply to a trigger word in ordinary chat.
struct Celebration {
    pattern: Regex,
    reply: String,
}

impl Celebration {
    fn new(trigger: &str, reply: &str) -> Option<Self> {
        if trigger.is_empty() || reply.is_empty() {
            return None;
        }
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(trigger))).ok()?;
        Some(Self {
            pattern,
            reply: reply.to_string(),
        })
    }
}

/// Routes chat lines to commands.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    data: DataLookupDispatcher,
    max_parse_depth: usize,
    celebration: Option<Celebration>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, data: DataLookupDispatcher, config: &CommandsConfig) -> Self {
        Self {
            registry,
            data,
            max_parse_depth: config.max_parse_depth,
            celebration: Celebration::new(&config.celebration_trigger, &config.celebration_reply),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle one inbound chat line. Failures never escape; at worst the bot
    /// says nothing.
    pub fn dispatch(&self, line: &ChatLine, sink: &mut dyn LineSink) {
        self.dispatch_at_depth(&line.sender, &line.target, &line.text, 0, sink);
    }

    pub(crate) fn dispatch_at_depth(
        &self,
        sender: &str,
        target: &str,
        text: &str,
        depth: usize,
        sink: &mut dyn LineSink,
    ) {
        if depth > self.max_parse_depth {
            debug!(sender = %sender, depth, "Parse depth exceeded, dropping line");
            return;
        }

        // Private messages are answered privately.
        let target = if is_channel(target) { target } else { sender };

        let Some(caps) = COMMAND_LINE.captures(text) else {
            if let Some(celebration) = &self.celebration
                && celebration.pattern.is_match(text)
            {
                sink.send(target, &celebration.reply);
            }
            return;
        };

        let command = caps[1].to_ascii_lowercase();
        let args = caps.get(2).map_or("", |m| m.as_str());

        let resolved = match self.registry.resolve(&command) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(command = %command, sender = %sender, error = %e, code = e.error_code(), "Command not resolved");
                return;
            }
        };

        let _span = spans::command(&command, sender, Some(target)).entered();
        let _timer = CommandTimer::new(&command);

        let room = RoomDescriptor::default();
        let user = UserDescriptor::new(sender);
        let connection = ConnectionDescriptor;
        let mut ctx = CapabilityContext::new(self, sink, sender, target, depth);

        match resolved
            .handler
            .handle(&mut ctx, args, &room, &user, &connection, &command)
        {
            Ok(()) => self.registry.record_use(resolved.name),
            Err(e) => {
                warn!(command = %command, sender = %sender, error = %e, code = e.error_code(), "Command failed");
            }
        }
    }

    /// Send handler output: one chat line per non-empty line of `text`.
    ///
    /// Handler output is plain text. Only data request lines are rewritten
    /// (into a data summary); HTML rules are never applied.
    pub(crate) fn reply(&self, target: &str, text: &str, sink: &mut dyn LineSink) {
        for piece in split_lines(text) {
            let piece = strip_raw(piece);
            if is_data_request(piece) {
                sink.send(target, &self.data.render_line(piece));
            } else {
                sink.send(target, piece);
            }
        }
    }
}
