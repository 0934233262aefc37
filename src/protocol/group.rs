//! Consumer-group member metadata and member assignment payloads.
//!
//! # Wire Format
//!
//! ```text
//! MemberMetadata:
//!   version: i16
//!   topic_count: i32
//!   topics: [String; topic_count]
//!
//! MemberAssignment:
//!   version: i16
//!   assignment_count: i32
//!   for each assignment:
//!     topic: String
//!     partition_count: i32
//!     partitions: [i32; partition_count]
//!
//! String:
//!   length: i16
//!   bytes: [u8; length]
//! ```
//!
//! All integers are big-endian. Bytes after the last entry (such as user
//! data) are not interpreted. The version is reported as-is.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::DecodeError;
use crate::protocol::reader::ByteView;

const HEADER_SIZE: usize = 6;

/// String bytes exactly as they appeared on the wire; no encoding assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RawString(Vec<u8>);

impl RawString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&[u8]> for RawString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for RawString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl PartialEq<&str> for RawString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for RawString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Topics a member subscribes to, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemberMetadata {
    pub version: i16,
    pub topics: Vec<RawString>,
}

/// Partitions of one topic assigned to a member, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TopicAssignment {
    pub topic: RawString,
    pub partitions: Vec<i32>,
}

/// Partition assignment of a member, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemberAssignment {
    pub version: i16,
    pub assignments: Vec<TopicAssignment>,
}

impl MemberAssignment {
    /// Partitions assigned for `topic`, empty if the topic is absent.
    pub fn partitions(&self, topic: &str) -> &[i32] {
        self.assignments
            .iter()
            .find(|a| a.topic == topic)
            .map(|a| a.partitions.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of partitions assigned.
    pub fn partition_count(&self) -> usize {
        self.assignments.iter().map(|a| a.partitions.len()).sum()
    }
}

/// Read a non-negative `i32` element count at `pos`.
fn read_count(view: &ByteView<'_>, pos: usize) -> Result<usize, DecodeError> {
    let count = view.read_i32(pos)?;
    if count < 0 {
        return Err(DecodeError::NegativeCount { pos, count });
    }
    Ok(count as usize)
}

/// Capacity to reserve for `count` elements of at least `min_size` bytes each,
/// bounded by what the rest of the buffer could hold.
fn bounded_capacity(view: &ByteView<'_>, pos: usize, count: usize, min_size: usize) -> usize {
    count.min(view.len().saturating_sub(pos) / min_size)
}

/// Decode a member metadata (subscription) payload.
pub fn decode_metadata(bytes: &[u8]) -> Result<MemberMetadata, DecodeError> {
    let view = ByteView::new(bytes);
    let version = view.read_i16(0)?;
    let topic_count = read_count(&view, 2)?;

    let mut pos = HEADER_SIZE;
    let mut topics = Vec::with_capacity(bounded_capacity(&view, pos, topic_count, 2));
    for _ in 0..topic_count {
        let topic = view.read_string(pos)?;
        pos += 2 + topic.len();
        topics.push(RawString::from(topic));
    }

    Ok(MemberMetadata { version, topics })
}

/// Decode a member assignment payload.
pub fn decode_assignment(bytes: &[u8]) -> Result<MemberAssignment, DecodeError> {
    let view = ByteView::new(bytes);
    let version = view.read_i16(0)?;
    let assignment_count = read_count(&view, 2)?;

    let mut pos = HEADER_SIZE;
    let mut assignments = Vec::with_capacity(bounded_capacity(&view, pos, assignment_count, 6));
    for _ in 0..assignment_count {
        let topic = view.read_string(pos)?;
        pos += 2 + topic.len();

        let partition_count = read_count(&view, pos)?;
        pos += 4;

        let mut partitions = Vec::with_capacity(bounded_capacity(&view, pos, partition_count, 4));
        for _ in 0..partition_count {
            partitions.push(view.read_i32(pos)?);
            pos += 4;
        }

        assignments.push(TopicAssignment {
            topic: RawString::from(topic),
            partitions,
        });
    }

    Ok(MemberAssignment {
        version,
        assignments,
    })
}

impl fmt::Display for MemberMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {}", self.version)?;
        write!(f, "topic count: {}", self.topics.len())?;
        for (i, topic) in self.topics.iter().enumerate() {
            write!(f, "\ntopic[{}] = {}", i, topic)?;
        }
        Ok(())
    }
}

impl fmt::Display for MemberAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {}", self.version)?;
        write!(f, "assign count: {}", self.assignments.len())?;
        for (i, assignment) in self.assignments.iter().enumerate() {
            let partitions = assignment
                .partitions
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            write!(
                f,
                "\nAssign [{}]: topic=\"{}\" partitions=[{}]",
                i, assignment.topic, partitions
            )?;
        }
        Ok(())
    }
}
