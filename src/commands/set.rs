use std::time::Duration;

use tokio::time::Instant;

use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::strings,
    resp::RespValue,
};

/// Represents the parsed arguments for the SET command.
#[derive(Debug, PartialEq)]
struct SetArguments {
    key: String,
    value: String,
    /// Time to live. Converted to a deadline when the command runs.
    ttl: Option<Duration>,
}

impl SetArguments {
    /// Parses `key value [EX seconds | PX milliseconds]...`.
    ///
    /// Options are read in pairs and the last one wins. Both are matched
    /// case-insensitively.
    ///
    /// # Returns
    ///
    /// * `Ok(SetArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::SyntaxError)` - Unknown option or an option without a value
    /// * `Err(CommandError::NotAnInteger)` - The expiration is not an integer
    /// * `Err(CommandError::InvalidExpireTime)` - The expiration is zero, negative or too large
    fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let mut ttl = None;
        let mut options = arguments[2..].iter();

        while let Some(option) = options.next() {
            let to_millis: u64 = match option.to_lowercase().as_str() {
                "ex" => 1000,
                "px" => 1,
                _ => return Err(CommandError::SyntaxError),
            };

            let Some(amount) = options.next() else {
                return Err(CommandError::SyntaxError);
            };

            let amount = amount
                .parse::<i64>()
                .map_err(|_| CommandError::NotAnInteger)?;

            if amount <= 0 {
                return Err(CommandError::InvalidExpireTime("set".to_string()));
            }

            let millis = (amount as u64)
                .checked_mul(to_millis)
                .ok_or_else(|| CommandError::InvalidExpireTime("set".to_string()))?;

            ttl = Some(Duration::from_millis(millis));
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            ttl,
        })
    }
}

/// Handles the Redis SET command.
///
/// Stores a string under the key, replacing whatever was there before
/// (including its kind and expiration). Replies `OK`.
pub struct Set;

impl Command for Set {
    fn name(&self) -> &'static str {
        "set"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let set_arguments = SetArguments::parse(arguments)?;

        let expiration = match set_arguments.ttl {
            Some(ttl) => Some(
                Instant::now()
                    .checked_add(ttl)
                    .ok_or_else(|| CommandError::InvalidExpireTime("set".to_string()))?,
            ),
            None => None,
        };

        strings::set(keyspace, set_arguments.key, set_arguments.value, expiration);

        Ok(CommandOutcome::Immediate(RespValue::SimpleString(
            "OK".to_string(),
        )))
    }
}
