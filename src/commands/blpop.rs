use std::time::Duration;

use tokio::time::Instant;

use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome, Suspension},
    key_value_store::KeySpace,
    ops::lists,
    resp::RespValue,
};

/// Represents the parsed arguments for the BLPOP command.
#[derive(Debug, PartialEq)]
struct BlpopArguments {
    keys: Vec<String>,
    /// `None` blocks forever.
    timeout: Option<Duration>,
}

impl BlpopArguments {
    /// Parses `key [key ...] timeout`, where the timeout is in seconds and may
    /// be fractional. `0` means wait forever.
    fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let (timeout, keys) = arguments
            .split_last()
            .ok_or_else(|| CommandError::WrongNumberOfArguments("blpop".to_string()))?;

        let seconds = timeout
            .parse::<f64>()
            .map_err(|_| CommandError::InvalidTimeout)?;

        if !seconds.is_finite() {
            return Err(CommandError::InvalidTimeout);
        }

        if seconds < 0.0 {
            return Err(CommandError::NegativeTimeout);
        }

        let timeout = if seconds == 0.0 {
            None
        } else {
            Some(Duration::try_from_secs_f64(seconds).map_err(|_| CommandError::InvalidTimeout)?)
        };

        Ok(Self {
            keys: keys.to_vec(),
            timeout,
        })
    }
}

/// Pops the head of the list at `key` as a `[key, element]` reply.
fn pop_front_reply(keyspace: &mut KeySpace, key: &str) -> Result<Option<RespValue>, CommandError> {
    let Some(popped) = lists::lpop(keyspace, key, 1)? else {
        return Ok(None);
    };

    Ok(popped
        .into_iter()
        .next()
        .map(|element| RespValue::from_strings([key.to_string(), element])))
}

/// Handles the Redis BLPOP command.
///
/// Pops from the first non-empty list among the keys, checked in the order
/// given. When all of them are empty the client is parked until another
/// client pushes to one of the keys or the timeout elapses, in which case
/// the reply is a null array.
pub struct Blpop;

impl Command for Blpop {
    fn name(&self) -> &'static str {
        "blpop"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let blpop_arguments = BlpopArguments::parse(arguments)?;

        for key in &blpop_arguments.keys {
            if let Some(reply) = pop_front_reply(keyspace, key)? {
                return Ok(CommandOutcome::Immediate(reply));
            }
        }

        let deadline = match blpop_arguments.timeout {
            Some(timeout) => Some(
                Instant::now()
                    .checked_add(timeout)
                    .ok_or(CommandError::InvalidTimeout)?,
            ),
            None => None,
        };

        Ok(CommandOutcome::Suspend(Suspension {
            keys: blpop_arguments.keys,
            deadline,
            retry: Box::new(|keyspace: &mut KeySpace, key: &str| {
                pop_front_reply(keyspace, key).ok().flatten()
            }),
        }))
    }
}
