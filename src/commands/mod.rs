//! Command handlers and the tri-state outcome they hand back to the engine.
//!
//! A handler never touches the blocking registry directly: writes that may
//! unblock someone report the key through [`CommandOutcome::ImmediateAndWake`],
//! and reads that have to wait describe themselves as a [`Suspension`].

use std::fmt;

use tokio::time::Instant;

use crate::{key_value_store::KeySpace, resp::RespValue};

mod blpop;
mod command_error;
mod del;
mod echo;
mod exists;
mod get;
mod incr;
mod llen;
mod lpop;
mod lrange;
mod ping;
mod registry;
mod rpush_and_lpush;
mod set;
mod stream_utils;
mod type_command;
mod xadd;
mod xrange;
mod xread;

pub use blpop::Blpop;
pub use command_error::CommandError;
pub use del::Del;
pub use echo::Echo;
pub use exists::Exists;
pub use get::Get;
pub use incr::Incr;
pub use llen::Llen;
pub use lpop::Lpop;
pub use lrange::Lrange;
pub use ping::Ping;
pub use registry::CommandRegistry;
pub use rpush_and_lpush::{Lpush, Rpush};
pub use set::Set;
pub use type_command::Type;
pub use xadd::Xadd;
pub use xrange::Xrange;
pub use xread::Xread;

/// Re-attempts a suspended command after a write to `key`. Returns `None`
/// while the command still cannot complete.
pub type RetryFn = Box<dyn FnMut(&mut KeySpace, &str) -> Option<RespValue> + Send>;

/// A request that could not be answered yet.
pub struct Suspension {
    /// Keys whose writes should re-attempt the command.
    pub keys: Vec<String>,
    /// `None` blocks forever.
    pub deadline: Option<Instant>,
    pub retry: RetryFn,
}

impl fmt::Debug for Suspension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suspension")
            .field("keys", &self.keys)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum CommandOutcome {
    /// Reply right away.
    Immediate(RespValue),
    /// Reply right away, then give one waiter on `key` a chance to complete.
    ImmediateAndWake { reply: RespValue, key: String },
    /// Park the client until a write to one of the keys or the deadline.
    Suspend(Suspension),
}

/// Accepted argument counts, verb excluded. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn check(&self, name: &str, count: usize) -> Result<(), CommandError> {
        match self.max {
            Some(max) if self.min == max && count != max => {
                Err(CommandError::WrongNumberOfArguments(name.to_string()))
            }
            Some(max) if count < self.min || count > max => {
                Err(CommandError::ArgumentCountOutOfRange {
                    name: name.to_string(),
                    min: self.min,
                    max,
                })
            }
            None if count < self.min => Err(CommandError::TooFewArguments {
                name: name.to_string(),
                min: self.min,
            }),
            _ => Ok(()),
        }
    }
}

pub trait Command: Send + Sync {
    /// Lowercase verb the command is registered under.
    fn name(&self) -> &'static str;

    fn arity(&self) -> Arity;

    /// Runs the command. `arguments` excludes the verb and has already passed
    /// the arity check.
    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError>;
}
