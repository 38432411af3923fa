use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::lists,
    resp::RespValue,
};

/// Handles the Redis LLEN command.
///
/// Replies with the length of the list at the key, `0` if the key does not exist.
pub struct Llen;

impl Command for Llen {
    fn name(&self) -> &'static str {
        "llen"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let length = lists::llen(keyspace, &arguments[0])?;
        Ok(CommandOutcome::Immediate(RespValue::Integer(length as i64)))
    }
}
