use std::collections::VecDeque;

use crate::{
    commands::CommandError,
    key_value_store::{DataType, KeySpace, Value},
};

/// Which end of the list a push or pop works on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListEnd {
    Head,
    Tail,
}

fn list_mut<'a>(
    keyspace: &'a mut KeySpace,
    key: &str,
) -> Result<Option<&'a mut VecDeque<String>>, CommandError> {
    match keyspace.get_mut(key) {
        None => Ok(None),
        Some(Value {
            data: DataType::List(list),
            ..
        }) => Ok(Some(list)),
        Some(_) => Err(CommandError::WrongType),
    }
}

fn add_values_to_list(list: &mut VecDeque<String>, values: &[String], end: ListEnd) {
    for value in values {
        match end {
            ListEnd::Head => list.push_front(value.clone()),
            ListEnd::Tail => list.push_back(value.clone()),
        }
    }
}

/// Pushes `values` one at a time onto `end`, creating the list if needed.
///
/// Pushing `a b c` to the head therefore leaves `c b a` at the front.
///
/// # Returns
///
/// * `Ok(usize)` - The length of the list after the push
/// * `Err(CommandError::WrongType)` - If the key holds something other than a list
pub fn push(
    keyspace: &mut KeySpace,
    key: &str,
    values: &[String],
    end: ListEnd,
) -> Result<usize, CommandError> {
    let length = match keyspace.get_mut(key) {
        Some(value) => {
            let DataType::List(ref mut list) = value.data else {
                return Err(CommandError::WrongType);
            };

            add_values_to_list(list, values, end);
            list.len()
        }
        None => {
            let mut list = VecDeque::with_capacity(values.len());
            add_values_to_list(&mut list, values, end);
            let length = list.len();

            keyspace.set(key.to_string(), Value::new(DataType::List(list)));
            length
        }
    };

    Ok(length)
}

/// Removes up to `count` elements from the head. `None` means the key does
/// not exist. A list emptied by the pop is deleted.
pub fn lpop(
    keyspace: &mut KeySpace,
    key: &str,
    count: usize,
) -> Result<Option<Vec<String>>, CommandError> {
    let Some(list) = list_mut(keyspace, key)? else {
        return Ok(None);
    };

    let amount = count.min(list.len());
    let popped = list.drain(..amount).collect::<Vec<String>>();
    let drained = list.is_empty();

    if drained {
        keyspace.delete(key);
    }

    Ok(Some(popped))
}

pub fn lrange(
    keyspace: &mut KeySpace,
    key: &str,
    start_index: i64,
    end_index: i64,
) -> Result<Vec<String>, CommandError> {
    let Some(list) = list_mut(keyspace, key)? else {
        return Ok(Vec::new());
    };

    let Some((start, end)) = normalize_range(list.len(), start_index, end_index) else {
        return Ok(Vec::new());
    };

    Ok(list.range(start..=end).cloned().collect())
}

pub fn llen(keyspace: &mut KeySpace, key: &str) -> Result<usize, CommandError> {
    Ok(list_mut(keyspace, key)?.map_or(0, |list| list.len()))
}

/// Converts possibly negative inclusive indexes into a valid `start..=end`
/// window over a list of `len` elements. Negative indexes count from the
/// tail (-1 is the last element).
///
/// ```text
/// // For a list of length 5:
/// // normalize_range(5, 0, 2)   -> Some((0, 2))
/// // normalize_range(5, -2, -1) -> Some((3, 4))
/// // normalize_range(5, 5, 10)  -> None
/// ```
fn normalize_range(len: usize, start_index: i64, end_index: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;

    if len == 0 {
        return None;
    }

    let mut start = if start_index < 0 {
        len.saturating_add(start_index)
    } else {
        start_index
    };
    let mut end = if end_index < 0 {
        len.saturating_add(end_index)
    } else {
        end_index
    };

    start = start.max(0);
    end = end.min(len - 1);

    if start >= len || start > end {
        return None;
    }

    Some((start as usize, end as usize))
}
