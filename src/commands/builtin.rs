//! Commands the bot ships with.
//!
//! - `data <name>` (aliases `dt`, `pokedex`): summary of whatever the name is
//! - `pokemon`, `item`, `ability`, `move <name>`: summary of a specific kind
//! - `echo <text>`: repeat text back
//! - `repeat <n> <line>`: run a command line several times
//! - `declare <text>`: staff announcement; always refused here
//! - `help`: list command names

use super::context::{CapabilityContext, ConnectionDescriptor, RoomDescriptor, UserDescriptor};
use super::registry::{CommandHandler, RegistryBuilder};
use crate::data::{DataLookupDispatcher, DataRequest};
use crate::dex::{DataKind, to_id};
use crate::error::{CommandError, HandlerResult};

/// Upper bound for `repeat`.
pub const MAX_REPEAT: usize = 5;

/// Add the built-in commands to a registry under construction.
///
/// `help` is registered last so its listing includes everything before it.
pub fn register(builder: RegistryBuilder, data: DataLookupDispatcher) -> RegistryBuilder {
    let builder = builder
        .handler("data", DataCommand { data })
        .alias("dt", "data")
        .alias("pokedex", "dt")
        .handler("pokemon", KindCommand(DataKind::Pokemon))
        .handler("item", KindCommand(DataKind::Item))
        .handler("ability", KindCommand(DataKind::Ability))
        .handler("move", KindCommand(DataKind::Move))
        .command("echo", echo)
        .command("repeat", repeat)
        .command("declare", declare);

    let mut names = builder.names();
    names.push("help".to_string());
    names.sort_unstable();
    builder.handler("help", HelpCommand { names })
}

fn required<'s>(args: &'s str, what: &'static str) -> Result<&'s str, CommandError> {
    let args = args.trim();
    if args.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(args)
    }
}

/// Looks the name up in every table and replies with a data request line.
pub struct DataCommand {
    data: DataLookupDispatcher,
}

impl CommandHandler for DataCommand {
    fn handle(
        &self,
        ctx: &mut CapabilityContext<'_>,
        args: &str,
        _room: &RoomDescriptor,
        _user: &UserDescriptor,
        _connection: &ConnectionDescriptor,
        _command: &str,
    ) -> HandlerResult {
        let name = required(args, "name")?;
        if !ctx.can_broadcast() {
            return Ok(());
        }

        let key = to_id(name);
        match self.data.find_kind(&key) {
            Some(kind) => ctx.send_reply(&DataRequest { kind, key }.to_line()),
            None => ctx.send_reply(&format!(
                "No Pokemon, item, move or ability named '{name}' was found."
            )),
        }
        Ok(())
    }
}

/// Replies with a data request of a fixed kind.
pub struct KindCommand(pub DataKind);

impl CommandHandler for KindCommand {
    fn handle(
        &self,
        ctx: &mut CapabilityContext<'_>,
        args: &str,
        _room: &RoomDescriptor,
        _user: &UserDescriptor,
        _connection: &ConnectionDescriptor,
        _command: &str,
    ) -> HandlerResult {
        let name = required(args, "name")?;
        ctx.send_reply(&DataRequest::new(self.0, name).to_line());
        Ok(())
    }
}

/// Lists every registered name.
pub struct HelpCommand {
    names: Vec<String>,
}

impl CommandHandler for HelpCommand {
    fn handle(
        &self,
        ctx: &mut CapabilityContext<'_>,
        _args: &str,
        _room: &RoomDescriptor,
        _user: &UserDescriptor,
        _connection: &ConnectionDescriptor,
        _command: &str,
    ) -> HandlerResult {
        ctx.send_reply(&format!("Commands: {}", self.names.join(", ")));
        Ok(())
    }
}

fn echo(
    ctx: &mut CapabilityContext<'_>,
    args: &str,
    _room: &RoomDescriptor,
    _user: &UserDescriptor,
    _connection: &ConnectionDescriptor,
    _command: &str,
) -> HandlerResult {
    let text = required(args, "text")?;
    if ctx.can_broadcast() {
        ctx.send_reply(text);
    }
    Ok(())
}

fn repeat(
    ctx: &mut CapabilityContext<'_>,
    args: &str,
    _room: &RoomDescriptor,
    _user: &UserDescriptor,
    _connection: &ConnectionDescriptor,
    _command: &str,
) -> HandlerResult {
    let args = required(args, "count")?;
    let (count, line) = args
        .split_once(char::is_whitespace)
        .ok_or(CommandError::MissingArgument("command line"))?;
    let count: usize = count
        .parse()
        .map_err(|_| CommandError::InvalidArgument(format!("not a count: {count}")))?;
    if count > MAX_REPEAT {
        return Err(CommandError::InvalidArgument(format!(
            "count {count} exceeds {MAX_REPEAT}"
        )));
    }

    let line = line.trim_start();
    for _ in 0..count {
        ctx.parse(line);
    }
    Ok(())
}

fn declare(
    ctx: &mut CapabilityContext<'_>,
    args: &str,
    _room: &RoomDescriptor,
    user: &UserDescriptor,
    _connection: &ConnectionDescriptor,
    command: &str,
) -> HandlerResult {
    if !ctx.can("declare") || !user.can("declare") {
        return Err(CommandError::PermissionDenied(command.to_string()));
    }
    ctx.send_reply_box(required(args, "text")?);
    Ok(())
}
