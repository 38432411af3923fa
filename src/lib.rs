//! An in-memory Redis server speaking RESP over TCP.
//!
//! Supported commands:
//!
//! - Strings: GET, SET (with EX/PX), INCR
//! - Lists: LPUSH, RPUSH, LPOP, LRANGE, LLEN and the blocking BLPOP
//! - Streams: XADD, XRANGE and XREAD (optionally blocking)
//! - Keys and server: DEL, EXISTS, TYPE, PING, ECHO
//!
//! All state lives in one [`engine::Engine`] task. Connection tasks decode
//! requests and forward them to it over a channel, so commands run one after
//! another without locks. Blocking commands park in the
//! [`blocking::BlockingRegistry`] until a write or their deadline completes them.

pub mod blocking;
pub mod commands;
pub mod connection;
pub mod engine;
pub mod key_value_store;
pub mod ops;
pub mod resp;
pub mod server;
pub mod stream;
