use std::{
    collections::HashSet,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    commands::CommandError,
    key_value_store::{DataType, KeySpace, Value},
    stream::{Stream, StreamEntry, StreamId, StreamIdPattern},
};

fn stream_ref<'a>(
    keyspace: &'a mut KeySpace,
    key: &str,
) -> Result<Option<&'a Stream>, CommandError> {
    match keyspace.get(key) {
        None => Ok(None),
        Some(Value {
            data: DataType::Stream(stream),
            ..
        }) => Ok(Some(stream)),
        Some(_) => Err(CommandError::WrongType),
    }
}

/// Wall-clock milliseconds since the Unix epoch, the timestamp `*` IDs use.
pub fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

pub fn top_id(keyspace: &mut KeySpace, key: &str) -> Result<Option<StreamId>, CommandError> {
    Ok(stream_ref(keyspace, key)?.and_then(Stream::top_id))
}

/// Appends an entry to the stream at `key`, creating the stream on first use.
///
/// # Arguments
///
/// * `pattern` - The ID argument, resolved against the current top ID
/// * `fields` - Field/value pairs in the order given
/// * `now_ms` - Wall-clock time used by `*`
///
/// # Returns
///
/// * `Ok(StreamId)` - The ID the entry was stored under
/// * `Err(CommandError)` - Wrong kind, duplicate field or an ID that does not
///   follow the top. Nothing is written in that case.
pub fn xadd(
    keyspace: &mut KeySpace,
    key: &str,
    pattern: StreamIdPattern,
    fields: Vec<(String, String)>,
    now_ms: u64,
) -> Result<StreamId, CommandError> {
    let mut seen = HashSet::with_capacity(fields.len());

    for (field, _) in &fields {
        if !seen.insert(field.as_str()) {
            return Err(CommandError::DuplicateStreamField(field.clone()));
        }
    }

    let top = top_id(keyspace, key)?;
    let id = pattern.resolve(top, now_ms)?;
    id.validate_successor(top)?;

    let entry = StreamEntry { id, fields };

    match keyspace.get_mut(key) {
        Some(value) => {
            let DataType::Stream(ref mut stream) = value.data else {
                return Err(CommandError::WrongType);
            };

            stream.append(entry)?;
        }
        None => {
            let mut stream = Stream::new();
            stream.append(entry)?;
            keyspace.set(key.to_string(), Value::new(DataType::Stream(stream)));
        }
    }

    Ok(id)
}

pub fn xrange(
    keyspace: &mut KeySpace,
    key: &str,
    start: StreamId,
    end: StreamId,
) -> Result<Vec<StreamEntry>, CommandError> {
    Ok(stream_ref(keyspace, key)?
        .map(|stream| stream.range(start, end).to_vec())
        .unwrap_or_default())
}

/// Entries strictly newer than `after`. `None` when there is nothing to
/// return, including when the stream does not exist.
pub fn xread(
    keyspace: &mut KeySpace,
    key: &str,
    after: StreamId,
) -> Result<Option<Vec<StreamEntry>>, CommandError> {
    let Some(stream) = stream_ref(keyspace, key)? else {
        return Ok(None);
    };

    let entries = stream.entries_after(after);

    if entries.is_empty() {
        Ok(None)
    } else {
        Ok(Some(entries.to_vec()))
    }
}
