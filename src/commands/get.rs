use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::strings,
    resp::RespValue,
};

/// Handles the Redis GET command.
///
/// Replies with the string stored at the key, or a null bulk string when the
/// key is missing or expired. Lists and streams fail with WRONGTYPE.
pub struct Get;

impl Command for Get {
    fn name(&self) -> &'static str {
        "get"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let reply = match strings::get(keyspace, &arguments[0])? {
            Some(content) => RespValue::BulkString(content),
            None => RespValue::NullBulkString,
        };

        Ok(CommandOutcome::Immediate(reply))
    }
}
