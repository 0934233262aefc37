//! Consumer-group payload decoding.
//!
//! `reader` holds the bounds-checked primitive reads; `group` decodes member
//! metadata and member assignment buffers returned by group listings.

mod group;
mod reader;

pub use group::{
    decode_assignment, decode_metadata, MemberAssignment, MemberMetadata, RawString,
    TopicAssignment,
};
pub use reader::ByteView;
