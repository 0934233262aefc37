//! kafka-client: owned librdkafka handles, sectioned configuration files and
//! consumer-group payload decoding.

pub mod client;
pub mod config;
pub mod config_file;
pub mod consumer;
pub mod error;
pub mod error_message;
pub mod groups;
pub mod handle;
pub mod message;
pub mod offsets;
pub mod producer;
pub mod protocol;
pub mod topic;
mod util;

pub use client::{Client, ClientType};
pub use config::{Config, GlobalConfig, TopicConfig};
pub use config_file::{parse_config, parse_config_str, read_config, read_config_or_exit};
pub use consumer::Consumer;
pub use error::{ConfigError, ConfigFileError, DecodeError, KafkaClientError, Result};
pub use error_message::ErrorMessage;
pub use groups::{GroupInfo, GroupMember};
pub use handle::OwnedHandle;
pub use message::Message;
pub use offsets::{CommitMode, PartitionOffset, OFFSET_INVALID};
pub use producer::Producer;
pub use protocol::{decode_assignment, decode_metadata, MemberAssignment, MemberMetadata};
pub use topic::Topic;
