//! Stream domain types: IDs, ID patterns and the append-only entry log.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum StreamError {
    #[error("The ID specified in XADD must be greater than 0-0")]
    ZeroId,
    #[error("The ID specified in XADD is equal or smaller than the target stream top item")]
    NotGreaterThanTop,
    #[error("The stream has exhausted the last possible ID, unable to add more items")]
    Exhausted,
    #[error("Invalid stream ID specified as stream command argument")]
    InvalidId,
}

/// A `(timestamp, sequence)` pair. Field order gives the derived ordering:
/// timestamp first, sequence second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId {
    pub timestamp: u64,
    pub sequence: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId::new(0, 0);
    pub const MAX: StreamId = StreamId::new(u64::MAX, u64::MAX);

    pub const fn new(timestamp: u64, sequence: u64) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }

    /// Checks that `self` may be appended after `top`.
    pub fn validate_successor(&self, top: Option<StreamId>) -> Result<(), StreamError> {
        if *self == StreamId::MIN {
            return Err(StreamError::ZeroId);
        }

        match top {
            Some(top) if *self <= top => Err(StreamError::NotGreaterThanTop),
            _ => Ok(()),
        }
    }

    /// Parses an XRANGE bound. `-` and `+` are the sentinels; a bare
    /// timestamp means its first sequence for a start bound and its last
    /// sequence for an end bound.
    pub fn parse_range_bound(input: &str, is_end: bool) -> Result<Self, StreamError> {
        match input {
            "-" => Ok(StreamId::MIN),
            "+" => Ok(StreamId::MAX),
            _ => match input.split_once('-') {
                Some(_) => input.parse(),
                None => {
                    let timestamp = parse_part(input)?;
                    let sequence = if is_end { u64::MAX } else { 0 };
                    Ok(StreamId::new(timestamp, sequence))
                }
            },
        }
    }

    /// Parses an XREAD cursor, where a bare timestamp means sequence 0.
    pub fn parse_cursor(input: &str) -> Result<Self, StreamError> {
        match input.split_once('-') {
            Some(_) => input.parse(),
            None => Ok(StreamId::new(parse_part(input)?, 0)),
        }
    }
}

fn parse_part(part: &str) -> Result<u64, StreamError> {
    part.parse::<u64>().map_err(|_| StreamError::InvalidId)
}

impl FromStr for StreamId {
    type Err = StreamError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((timestamp, sequence)) = input.split_once('-') else {
            return Err(StreamError::InvalidId);
        };

        Ok(StreamId::new(parse_part(timestamp)?, parse_part(sequence)?))
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.timestamp, self.sequence)
    }
}

/// The ID argument of XADD before it is resolved against a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamIdPattern {
    /// `*`
    Auto,
    /// `<ts>-*`
    AutoSequence(u64),
    /// `<ts>-<seq>`
    Explicit(StreamId),
}

impl FromStr for StreamIdPattern {
    type Err = StreamError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "*" {
            return Ok(StreamIdPattern::Auto);
        }

        match input.split_once('-') {
            Some((timestamp, "*")) => Ok(StreamIdPattern::AutoSequence(parse_part(timestamp)?)),
            _ => Ok(StreamIdPattern::Explicit(input.parse()?)),
        }
    }
}

impl StreamIdPattern {
    /// Resolves the pattern against the stream's current top ID. The result
    /// still has to pass [`StreamId::validate_successor`].
    pub fn resolve(&self, top: Option<StreamId>, now_ms: u64) -> Result<StreamId, StreamError> {
        match *self {
            StreamIdPattern::Auto => match top {
                Some(top) if now_ms <= top.timestamp => next_in_millisecond(top),
                _ => Ok(StreamId::new(now_ms, 0)),
            },
            StreamIdPattern::AutoSequence(timestamp) => match top {
                Some(top) if top.timestamp == timestamp => next_in_millisecond(top),
                _ if timestamp == 0 => Ok(StreamId::new(0, 1)),
                _ => Ok(StreamId::new(timestamp, 0)),
            },
            StreamIdPattern::Explicit(id) => Ok(id),
        }
    }
}

fn next_in_millisecond(top: StreamId) -> Result<StreamId, StreamError> {
    let sequence = top.sequence.checked_add(1).ok_or(StreamError::Exhausted)?;
    Ok(StreamId::new(top.timestamp, sequence))
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: Vec<(String, String)>,
}

/// Append-only log of entries with strictly increasing IDs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stream {
    entries: Vec<StreamEntry>,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_id(&self) -> Option<StreamId> {
        self.entries.last().map(|entry| entry.id)
    }

    /// Appends `entry`, leaving the stream unchanged if its ID does not
    /// follow the current top.
    pub fn append(&mut self, entry: StreamEntry) -> Result<(), StreamError> {
        entry.id.validate_successor(self.top_id())?;
        self.entries.push(entry);
        Ok(())
    }

    /// Entries with `start <= id <= end`, ascending.
    pub fn range(&self, start: StreamId, end: StreamId) -> &[StreamEntry] {
        if start > end {
            return &[];
        }

        let from = self.entries.partition_point(|entry| entry.id < start);
        let to = self.entries.partition_point(|entry| entry.id <= end);

        &self.entries[from..to]
    }

    /// Entries with `id > after`, ascending.
    pub fn entries_after(&self, after: StreamId) -> &[StreamEntry] {
        let from = self.entries.partition_point(|entry| entry.id <= after);
        &self.entries[from..]
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
