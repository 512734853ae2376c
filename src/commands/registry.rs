//! Command registry and alias resolution.
//!
//! A registered name maps either to a handler or to another name. Resolution
//! walks the alias chain with an explicit hop budget, so a cycle or a
//! dangling alias is a [`ResolveError`] rather than a hang.

use super::context::{CapabilityContext, ConnectionDescriptor, RoomDescriptor, UserDescriptor};
use crate::error::{HandlerResult, ResolveError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default alias hop budget.
pub const DEFAULT_MAX_ALIAS_HOPS: usize = 16;

/// A chat command implementation.
///
/// Handlers only ever see the restricted [`CapabilityContext`] plus the
/// fixed set of descriptors; they cannot reach the dispatcher or registry.
pub trait CommandHandler: Send + Sync {
    fn handle(
        &self,
        ctx: &mut CapabilityContext<'_>,
        args: &str,
        room: &RoomDescriptor,
        user: &UserDescriptor,
        connection: &ConnectionDescriptor,
        command: &str,
    ) -> HandlerResult;
}

impl<F> CommandHandler for F
where
    F: Fn(
            &mut CapabilityContext<'_>,
            &str,
            &RoomDescriptor,
            &UserDescriptor,
            &ConnectionDescriptor,
            &str,
        ) -> HandlerResult
        + Send
        + Sync,
{
    fn handle(
        &self,
        ctx: &mut CapabilityContext<'_>,
        args: &str,
        room: &RoomDescriptor,
        user: &UserDescriptor,
        connection: &ConnectionDescriptor,
        command: &str,
    ) -> HandlerResult {
        self(ctx, args, room, user, connection, command)
    }
}

/// A registry value.
#[derive(Clone)]
pub enum Entry {
    Handler(Arc<dyn CommandHandler>),
    Alias(String),
}

/// One resolution step.
pub enum Step<'r> {
    Handler(&'r Arc<dyn CommandHandler>),
    Alias(&'r str),
    NotFound,
}

/// The outcome of a successful resolution.
pub struct Resolved<'r> {
    /// Name of the registry entry that holds the handler.
    pub name: &'r str,
    pub handler: &'r Arc<dyn CommandHandler>,
    /// Alias hops taken to reach it.
    pub hops: usize,
}

/// Registry of chat commands. Names are case-insensitive.
pub struct CommandRegistry {
    entries: HashMap<String, Entry>,
    max_hops: usize,
    /// Successful invocations per handler entry.
    command_counts: HashMap<String, AtomicU64>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look at a single entry without following aliases.
    pub fn step(&self, name: &str) -> Step<'_> {
        match self.entries.get(&name.to_ascii_lowercase()) {
            Some(Entry::Handler(h)) => Step::Handler(h),
            Some(Entry::Alias(next)) => Step::Alias(next),
            None => Step::NotFound,
        }
    }

    /// Follow aliases from `name` to a handler.
    pub fn resolve(&self, name: &str) -> Result<Resolved<'_>, ResolveError> {
        let original = name.to_ascii_lowercase();
        let Some((key, _)) = self.entries.get_key_value(&original) else {
            return Err(ResolveError::UnknownCommand(original));
        };
        let mut current: &str = key;

        for hops in 0..=self.max_hops {
            match self.step(current) {
                Step::Handler(handler) => {
                    return Ok(Resolved {
                        name: current,
                        handler,
                        hops,
                    });
                }
                Step::Alias(next) => current = next,
                Step::NotFound => return Err(ResolveError::UnknownCommand(original)),
            }
        }

        Err(ResolveError::AliasCycle {
            name: original,
            hops: self.max_hops,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub(crate) fn record_use(&self, name: &str) {
        if let Some(counter) = self.command_counts.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Usage counts for commands run at least once, most used first.
    pub fn get_command_stats(&self) -> Vec<(&str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (cmd.as_str(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }
}

/// Collects registrations before the registry is frozen.
pub struct RegistryBuilder {
    entries: HashMap<String, Entry>,
    max_hops: usize,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            max_hops: DEFAULT_MAX_ALIAS_HOPS,
        }
    }
}

impl RegistryBuilder {
    pub fn max_hops(mut self, hops: usize) -> Self {
        self.max_hops = hops;
        self
    }

    /// Register a handler object.
    pub fn handler(mut self, name: &str, handler: impl CommandHandler + 'static) -> Self {
        self.entries
            .insert(name.to_ascii_lowercase(), Entry::Handler(Arc::new(handler)));
        self
    }

    /// Register a plain function or closure.
    pub fn command<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(
                &mut CapabilityContext<'_>,
                &str,
                &RoomDescriptor,
                &UserDescriptor,
                &ConnectionDescriptor,
                &str,
            ) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.handler(name, f)
    }

    /// Register `name` as another name for `target`.
    pub fn alias(mut self, name: &str, target: &str) -> Self {
        self.entries.insert(
            name.to_ascii_lowercase(),
            Entry::Alias(target.to_ascii_lowercase()),
        );
        self
    }

    /// Names registered so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn build(self) -> CommandRegistry {
        let command_counts = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Handler(_)))
            .map(|(name, _)| (name.clone(), AtomicU64::new(0)))
            .collect();

        CommandRegistry {
            entries: self.entries,
            max_hops: self.max_hops,
            command_counts,
        }
    }
}
