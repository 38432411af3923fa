use tokio::time::Instant;

use crate::{
    commands::CommandError,
    key_value_store::{DataType, KeySpace, Value},
};

pub fn get(keyspace: &mut KeySpace, key: &str) -> Result<Option<String>, CommandError> {
    match keyspace.get(key) {
        None => Ok(None),
        Some(Value {
            data: DataType::String(content),
            ..
        }) => Ok(Some(content.clone())),
        Some(_) => Err(CommandError::WrongType),
    }
}

pub fn set(keyspace: &mut KeySpace, key: String, content: String, expiration: Option<Instant>) {
    keyspace.set(
        key,
        Value {
            data: DataType::String(content),
            expiration,
        },
    );
}

/// Adds one to the integer stored at `key`, treating a missing key as `0`.
/// A non-numeric value is left as it was.
pub fn incr(keyspace: &mut KeySpace, key: &str) -> Result<i64, CommandError> {
    let Some(value) = keyspace.get_mut(key) else {
        keyspace.set(key.to_string(), Value::new(DataType::String("1".to_string())));
        return Ok(1);
    };

    let DataType::String(ref mut stored) = value.data else {
        return Err(CommandError::WrongType);
    };

    let incremented = stored
        .parse::<i64>()
        .ok()
        .and_then(|current| current.checked_add(1))
        .ok_or(CommandError::NotAnInteger)?;
    *stored = incremented.to_string();

    Ok(incremented)
}
