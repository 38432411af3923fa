use thiserror::Error;

use crate::{resp::RespValue, stream::StreamError};

/// Every user-visible failure a request can produce. The `Display` text is
/// the exact message sent to the client.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum CommandError {
    #[error("ERR Protocol error: expected array of bulk strings")]
    InvalidCommand,
    #[error("ERR empty command")]
    EmptyCommand,
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("ERR '{name}' command takes between {min} and {max} arguments")]
    ArgumentCountOutOfRange {
        name: String,
        min: usize,
        max: usize,
    },
    #[error("ERR '{name}' command takes at least {min} arguments")]
    TooFewArguments { name: String, min: usize },
    #[error("ERR syntax error")]
    SyntaxError,
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("ERR value is out of range, must be positive")]
    NotPositive,
    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(String),
    #[error("ERR timeout is not a float or out of range")]
    InvalidTimeout,
    #[error("ERR timeout is negative")]
    NegativeTimeout,
    #[error("ERR duplicate field '{0}' in stream entry")]
    DuplicateStreamField(String),
    #[error(
        "ERR Unbalanced 'xread' list of streams: for each stream key an ID or '$' must be specified."
    )]
    UnbalancedStreams,
    #[error("ERR {0}")]
    Stream(#[from] StreamError),
}

impl CommandError {
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error(self.to_string())
    }
}
