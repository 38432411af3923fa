use std::collections::HashMap;

use crate::{
    commands::{
        Blpop, Command, CommandError, CommandOutcome, Del, Echo, Exists, Get, Incr, Llen, Lpop,
        Lpush, Lrange, Ping, Rpush, Set, Type, Xadd, Xrange, Xread,
    },
    key_value_store::KeySpace,
    resp::RespValue,
};

/// Maps lowercase verbs to their handlers.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported command.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(Ping));
        registry.register(Box::new(Echo));
        registry.register(Box::new(Get));
        registry.register(Box::new(Set));
        registry.register(Box::new(Incr));
        registry.register(Box::new(Type));
        registry.register(Box::new(Del));
        registry.register(Box::new(Exists));
        registry.register(Box::new(Rpush));
        registry.register(Box::new(Lpush));
        registry.register(Box::new(Llen));
        registry.register(Box::new(Lpop));
        registry.register(Box::new(Lrange));
        registry.register(Box::new(Blpop));
        registry.register(Box::new(Xadd));
        registry.register(Box::new(Xrange));
        registry.register(Box::new(Xread));

        registry
    }

    /// Adds `command`, replacing any command already registered under its name.
    pub fn register(&mut self, command: Box<dyn Command>) {
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .get(name.to_lowercase().as_str())
            .map(|command| command.as_ref())
    }

    /// Registered verbs, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Turns a decoded request into a command outcome.
    ///
    /// # Arguments
    ///
    /// * `input` - The decoded request, expected to be an array of bulk strings
    /// * `keyspace` - The keyspace the command runs against
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutcome)` - Whatever the command produced
    /// * `Err(CommandError::InvalidCommand)` - If the request is not an array of bulk strings
    /// * `Err(CommandError::EmptyCommand)` - If the array is empty
    /// * `Err(CommandError::UnknownCommand)` - If no command is registered under the verb
    /// * `Err(CommandError)` - Arity failures and errors raised by the command itself
    pub fn dispatch(
        &self,
        input: RespValue,
        keyspace: &mut KeySpace,
    ) -> Result<CommandOutcome, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommand);
        };

        let mut parts = elements
            .into_iter()
            .map(|element| match element {
                RespValue::BulkString(part) => Ok(part),
                _ => Err(CommandError::InvalidCommand),
            })
            .collect::<Result<Vec<String>, CommandError>>()?;

        if parts.is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        let verb = parts.remove(0);

        let Some(command) = self.get(&verb) else {
            return Err(CommandError::UnknownCommand(verb));
        };

        command.arity().check(command.name(), parts.len())?;
        command.execute(keyspace, &parts)
    }
}
