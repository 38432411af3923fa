//! RESP (Redis Serialization Protocol) values and the wire codec.
//!
//! Decoding is incremental: [`RespValue::decode`] either consumes exactly one
//! complete frame from the front of the buffer or leaves the buffer untouched
//! when more bytes are needed.

use bytes::{Buf, BytesMut};
use thiserror::Error;

/// Arrays nested deeper than this are rejected.
const MAX_ARRAY_DEPTH: usize = 10;
/// 512 MB, same ceiling as Redis.
const MAX_BULK_STRING_LENGTH: usize = 512 * 1024 * 1024;

/// Errors that make a byte sequence undecodable.
#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type '{0}'")]
    UnknownRespType(char),
    #[error("empty RESP line")]
    EmptyLine,
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk string length")]
    InvalidBulkStringLength,
    #[error("bulk string is not terminated by CRLF")]
    UnterminatedBulkString,
    #[error("invalid array length")]
    InvalidArrayLength,
    #[error("arrays nested too deeply")]
    ArrayTooDeep,
}

impl RespError {
    /// The reply sent to a client whose input could not be decoded. The detail
    /// only goes to the log.
    pub fn as_resp(&self) -> RespValue {
        RespValue::Error("ERR Protocol error".to_string())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    NullBulkString,
    Array(Vec<RespValue>),
    NullArray,
}

impl RespValue {
    /// Builds an array of bulk strings.
    pub fn from_strings<I>(items: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        RespValue::Array(items.into_iter().map(RespValue::BulkString).collect())
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::Error(e) => format!("-{}\r\n", e),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::NullBulkString => "$-1\r\n".to_string(),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());

                for element in elements {
                    encoded.push_str(&element.encode());
                }

                encoded
            }
            RespValue::NullArray => "*-1\r\n".to_string(),
        }
    }

    /// Decodes one frame from the front of `buffer`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - A complete frame was decoded and removed from the buffer
    /// * `Ok(None)` - The buffer holds an incomplete frame; nothing was consumed
    /// * `Err(RespError)` - The buffer starts with bytes that can never form a valid frame
    pub fn decode(buffer: &mut BytesMut) -> Result<Option<Self>, RespError> {
        match parse_frame(&buffer[..], 0, 0)? {
            Some((value, consumed)) => {
                buffer.advance(consumed);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

fn find_crlf(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(2)
        .position(|window| window == b"\r\n")
        .map(|offset| from + offset)
}

fn parse_length(line: &str) -> Result<i64, RespError> {
    line.parse::<i64>()
        .map_err(|_| RespError::FailedToParseInteger)
}

fn parse_frame(
    buffer: &[u8],
    position: usize,
    depth: usize,
) -> Result<Option<(RespValue, usize)>, RespError> {
    let Some(line_end) = find_crlf(buffer, position) else {
        return Ok(None);
    };

    if line_end == position {
        return Err(RespError::EmptyLine);
    }

    let prefix = buffer[position];
    let line = std::str::from_utf8(&buffer[position + 1..line_end])
        .map_err(|_| RespError::InvalidUtf8)?;
    let next = line_end + 2;

    match prefix {
        b'+' => Ok(Some((RespValue::SimpleString(line.to_string()), next))),
        b'-' => Ok(Some((RespValue::Error(line.to_string()), next))),
        b':' => Ok(Some((RespValue::Integer(parse_length(line)?), next))),
        b'$' => {
            let length = parse_length(line)?;

            if length == -1 {
                return Ok(Some((RespValue::NullBulkString, next)));
            }

            let length =
                usize::try_from(length).map_err(|_| RespError::InvalidBulkStringLength)?;

            if length > MAX_BULK_STRING_LENGTH {
                return Err(RespError::InvalidBulkStringLength);
            }

            let content_end = next + length;

            if buffer.len() < content_end + 2 {
                return Ok(None);
            }

            if &buffer[content_end..content_end + 2] != b"\r\n" {
                return Err(RespError::UnterminatedBulkString);
            }

            let content = std::str::from_utf8(&buffer[next..content_end])
                .map_err(|_| RespError::InvalidUtf8)?;

            Ok(Some((RespValue::BulkString(content.to_string()), content_end + 2)))
        }
        b'*' => {
            let length = parse_length(line)?;

            if length == -1 {
                return Ok(Some((RespValue::NullArray, next)));
            }

            let length = usize::try_from(length).map_err(|_| RespError::InvalidArrayLength)?;

            if depth >= MAX_ARRAY_DEPTH {
                return Err(RespError::ArrayTooDeep);
            }

            let mut elements = Vec::with_capacity(length.min(1024));
            let mut cursor = next;

            for _ in 0..length {
                let Some((element, element_end)) = parse_frame(buffer, cursor, depth + 1)? else {
                    return Ok(None);
                };

                elements.push(element);
                cursor = element_end;
            }

            Ok(Some((RespValue::Array(elements), cursor)))
        }
        other => Err(RespError::UnknownRespType(other as char)),
    }
}
