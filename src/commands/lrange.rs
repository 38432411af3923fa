use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::lists,
    resp::RespValue,
};

/// Handles the Redis LRANGE command.
///
/// Returns the elements between two inclusive indexes. Negative indexes count
/// from the end of the list, out-of-range indexes are clamped, and an empty
/// window is an empty array rather than an error.
///
/// # Examples
///
/// ```text
/// LRANGE mylist 0 2    (first 3 elements)
/// LRANGE mylist -2 -1  (last 2 elements)
/// ```
pub struct Lrange;

impl Command for Lrange {
    fn name(&self) -> &'static str {
        "lrange"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let Ok(start_index) = arguments[1].parse::<i64>() else {
            return Err(CommandError::NotAnInteger);
        };

        let Ok(end_index) = arguments[2].parse::<i64>() else {
            return Err(CommandError::NotAnInteger);
        };

        let range = lists::lrange(keyspace, &arguments[0], start_index, end_index)?;

        Ok(CommandOutcome::Immediate(RespValue::from_strings(range)))
    }
}
