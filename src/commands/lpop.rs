use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::lists,
    resp::RespValue,
};

/// Handles the Redis LPOP command.
///
/// Removes and returns elements from the head of a list.
///
/// * `LPOP key` replies with a bulk string, or null when the key does not exist
/// * `LPOP key count` replies with an array of up to `count` elements, or a
///   null array when the key does not exist
pub struct Lpop;

impl Command for Lpop {
    fn name(&self) -> &'static str {
        "lpop"
    }

    fn arity(&self) -> Arity {
        Arity::between(1, 2)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let key = &arguments[0];

        let Some(count) = arguments.get(1) else {
            let popped = lists::lpop(keyspace, key, 1)?;

            let reply = match popped.and_then(|elements| elements.into_iter().next()) {
                Some(element) => RespValue::BulkString(element),
                None => RespValue::NullBulkString,
            };

            return Ok(CommandOutcome::Immediate(reply));
        };

        let count = count
            .parse::<i64>()
            .map_err(|_| CommandError::NotAnInteger)?;
        let count = usize::try_from(count).map_err(|_| CommandError::NotPositive)?;

        let reply = match lists::lpop(keyspace, key, count)? {
            Some(popped) => RespValue::from_strings(popped),
            None => RespValue::NullArray,
        };

        Ok(CommandOutcome::Immediate(reply))
    }
}
