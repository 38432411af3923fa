use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::streams,
    resp::RespValue,
    stream::StreamIdPattern,
};

/// Represents the parsed arguments for the XADD command.
#[derive(Debug, PartialEq)]
struct XaddArguments {
    key: String,
    id: StreamIdPattern,
    fields: Vec<(String, String)>,
}

impl XaddArguments {
    /// Parses `key id field value [field value ...]`.
    ///
    /// # Returns
    ///
    /// * `Ok(XaddArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::WrongNumberOfArguments)` - A field has no value
    /// * `Err(CommandError::Stream)` - The ID is neither `*`, `<ms>-*` nor `<ms>-<seq>`
    fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let pairs = &arguments[2..];

        if pairs.is_empty() || pairs.len() % 2 != 0 {
            return Err(CommandError::WrongNumberOfArguments("xadd".to_string()));
        }

        let id = arguments[1].parse::<StreamIdPattern>()?;

        let fields = pairs
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        Ok(Self {
            key: arguments[0].clone(),
            id,
            fields,
        })
    }
}

/// Handles the Redis XADD command.
///
/// Appends an entry to the stream, creating the stream if needed, and replies
/// with the ID it was stored under. One client blocked on the stream gets a
/// chance to read the new entry.
pub struct Xadd;

impl Command for Xadd {
    fn name(&self) -> &'static str {
        "xadd"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(4)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let xadd_arguments = XaddArguments::parse(arguments)?;

        let id = streams::xadd(
            keyspace,
            &xadd_arguments.key,
            xadd_arguments.id,
            xadd_arguments.fields,
            streams::current_time_ms(),
        )?;

        Ok(CommandOutcome::ImmediateAndWake {
            reply: RespValue::BulkString(id.to_string()),
            key: xadd_arguments.key,
        })
    }
}
