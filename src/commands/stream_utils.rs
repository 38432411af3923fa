use crate::{resp::RespValue, stream::StreamEntry};

/// Converts stream entries to the RESP shape XRANGE and XREAD reply with.
///
/// Each entry becomes a 2-element array: `[id, [field1, value1, field2, value2, ...]]`,
/// with fields in insertion order.
///
/// # Examples
///
/// ```text
/// [1234-0 {temp: 25}]  ->  *1\r\n*2\r\n$6\r\n1234-0\r\n*2\r\n$4\r\ntemp\r\n$2\r\n25\r\n
/// ```
pub fn stream_entries_to_resp(entries: &[StreamEntry]) -> RespValue {
    let response = entries
        .iter()
        .map(|entry| {
            let mut stream_values: Vec<RespValue> = Vec::with_capacity(entry.fields.len() * 2);

            for (field, value) in &entry.fields {
                stream_values.push(RespValue::BulkString(field.clone()));
                stream_values.push(RespValue::BulkString(value.clone()));
            }

            RespValue::Array(vec![
                RespValue::BulkString(entry.id.to_string()),
                RespValue::Array(stream_values),
            ])
        })
        .collect::<Vec<RespValue>>();

    RespValue::Array(response)
}
