use std::time::Duration;

use tokio::time::Instant;

use crate::{
    commands::{
        stream_utils::stream_entries_to_resp, Arity, Command, CommandError, CommandOutcome,
        Suspension,
    },
    key_value_store::KeySpace,
    ops::streams,
    resp::RespValue,
    stream::StreamId,
};

/// Represents the parsed arguments for the XREAD command.
///
/// Format: `XREAD [BLOCK milliseconds] STREAMS key1 key2 ... id1 id2 ...`
#[derive(Debug, PartialEq)]
struct XreadArguments {
    /// `None` for a plain read, `Some(None)` to block forever and
    /// `Some(Some(duration))` to block with a timeout.
    block: Option<Option<Duration>>,
    /// `(key, id)` pairs in the order the keys were given. The ID is still
    /// raw so that `$` can be resolved against the keyspace.
    key_stream_pairs: Vec<(String, String)>,
}

impl XreadArguments {
    /// Parses command arguments into structured XreadArguments.
    ///
    /// # Returns
    ///
    /// * `Ok(XreadArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::SyntaxError)` - Missing `STREAMS` or an unknown option
    /// * `Err(CommandError::NotAnInteger)` - The block duration is not an integer
    /// * `Err(CommandError::NegativeTimeout)` - The block duration is negative
    /// * `Err(CommandError::UnbalancedStreams)` - Keys and IDs do not pair up
    fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        let (block, start_data_index) = match arguments[0].to_lowercase().as_str() {
            "block" => {
                let duration_ms = arguments[1]
                    .parse::<i64>()
                    .map_err(|_| CommandError::NotAnInteger)?;

                if duration_ms < 0 {
                    return Err(CommandError::NegativeTimeout);
                }

                if !arguments
                    .get(2)
                    .is_some_and(|option| option.eq_ignore_ascii_case("streams"))
                {
                    return Err(CommandError::SyntaxError);
                }

                let timeout = match duration_ms {
                    0 => None,
                    duration_ms => Some(Duration::from_millis(duration_ms as u64)),
                };

                (Some(timeout), 3)
            }
            "streams" => (None, 1),
            _ => return Err(CommandError::SyntaxError),
        };

        let data = &arguments[start_data_index..];

        if data.is_empty() || data.len() % 2 != 0 {
            return Err(CommandError::UnbalancedStreams);
        }

        let (keys, ids) = data.split_at(data.len() / 2);

        let key_stream_pairs = keys
            .iter()
            .cloned()
            .zip(ids.iter().cloned())
            .collect();

        Ok(Self {
            block,
            key_stream_pairs,
        })
    }
}

/// Reads every stream past its cursor.
///
/// # Returns
///
/// * `Ok(Some(RespValue))` - `[[key, entries], ...]` for the streams that had new entries
/// * `Ok(None)` - None of the streams had anything newer
fn read_streams(
    keyspace: &mut KeySpace,
    cursors: &[(String, StreamId)],
) -> Result<Option<RespValue>, CommandError> {
    let mut response = Vec::new();

    for (key, after) in cursors {
        if let Some(entries) = streams::xread(keyspace, key, *after)? {
            response.push(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                stream_entries_to_resp(&entries),
            ]));
        }
    }

    if response.is_empty() {
        Ok(None)
    } else {
        Ok(Some(RespValue::Array(response)))
    }
}

/// Handles the Redis XREAD command.
///
/// Replies with the entries newer than each given ID. `$` means "newer than
/// whatever the stream holds right now", so it only makes sense together with
/// BLOCK. Without BLOCK, or when the block times out, an empty result is a
/// null array.
pub struct Xread;

impl Command for Xread {
    fn name(&self) -> &'static str {
        "xread"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(3)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let xread_arguments = XreadArguments::parse(arguments)?;

        let mut cursors = Vec::with_capacity(xread_arguments.key_stream_pairs.len());

        for (key, id) in xread_arguments.key_stream_pairs {
            let after = if id == "$" {
                streams::top_id(keyspace, &key)?.unwrap_or(StreamId::MIN)
            } else {
                StreamId::parse_cursor(&id)?
            };

            cursors.push((key, after));
        }

        if let Some(reply) = read_streams(keyspace, &cursors)? {
            return Ok(CommandOutcome::Immediate(reply));
        }

        let Some(timeout) = xread_arguments.block else {
            return Ok(CommandOutcome::Immediate(RespValue::NullArray));
        };

        let deadline = match timeout {
            Some(timeout) => Some(
                Instant::now()
                    .checked_add(timeout)
                    .ok_or(CommandError::InvalidTimeout)?,
            ),
            None => None,
        };

        Ok(CommandOutcome::Suspend(Suspension {
            keys: cursors.iter().map(|(key, _)| key.clone()).collect(),
            deadline,
            retry: Box::new(move |keyspace: &mut KeySpace, _key: &str| {
                read_streams(keyspace, &cursors).ok().flatten()
            }),
        }))
    }
}
