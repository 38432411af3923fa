//! Per-type operations layered over the [`KeySpace`](crate::key_value_store::KeySpace).
//!
//! Every function here checks the kind stored at the key first and fails with
//! [`CommandError::WrongType`](crate::commands::CommandError::WrongType)
//! without touching the keyspace when it does not match.

pub mod lists;
pub mod streams;
pub mod strings;
