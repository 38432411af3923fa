use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// Handles the Redis ECHO command.
///
/// Returns the exact string provided as its only argument, as a bulk string.
///
/// # Examples
///
/// ```text
/// ECHO "hello world"  ->  $11\r\nhello world\r\n
/// ```
pub struct Echo;

impl Command for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(
        &self,
        _keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        Ok(CommandOutcome::Immediate(RespValue::BulkString(
            arguments[0].clone(),
        )))
    }
}
