use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::lists::{self, ListEnd},
    resp::RespValue,
};

/// Shared body of RPUSH and LPUSH.
///
/// Replies with the new length and asks the engine to wake one client
/// blocked on the key.
fn push_and_wake(
    keyspace: &mut KeySpace,
    arguments: &[String],
    end: ListEnd,
) -> Result<CommandOutcome, CommandError> {
    let key = &arguments[0];
    let length = lists::push(keyspace, key, &arguments[1..], end)?;

    Ok(CommandOutcome::ImmediateAndWake {
        reply: RespValue::Integer(length as i64),
        key: key.clone(),
    })
}

/// `RPUSH key element [element ...]`
pub struct Rpush;

impl Command for Rpush {
    fn name(&self) -> &'static str {
        "rpush"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        push_and_wake(keyspace, arguments, ListEnd::Tail)
    }
}

/// `LPUSH key element [element ...]`. Elements are prepended one at a time,
/// so they end up in reverse order.
pub struct Lpush;

impl Command for Lpush {
    fn name(&self) -> &'static str {
        "lpush"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        push_and_wake(keyspace, arguments, ListEnd::Head)
    }
}
