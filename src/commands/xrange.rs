use crate::{
    commands::{stream_utils::stream_entries_to_resp, Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::streams,
    stream::StreamId,
};

/// Handles the Redis XRANGE command.
///
/// Returns the entries whose IDs fall within `start..=end`. `-` and `+` stand
/// for the smallest and largest possible IDs, and a bare millisecond
/// timestamp covers every sequence number in that millisecond.
///
/// # Examples
///
/// ```text
/// XRANGE weather - +             (every entry)
/// XRANGE weather 1526985054069 + (everything from that millisecond on)
/// ```
pub struct Xrange;

impl Command for Xrange {
    fn name(&self) -> &'static str {
        "xrange"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let start = StreamId::parse_range_bound(&arguments[1], false)?;
        let end = StreamId::parse_range_bound(&arguments[2], true)?;

        let entries = streams::xrange(keyspace, &arguments[0], start, end)?;

        Ok(CommandOutcome::Immediate(stream_entries_to_resp(&entries)))
    }
}
