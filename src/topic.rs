//! Topic handles.

use std::ffi::CString;

use rdkafka::bindings as rdsys;
use tracing::debug;

use crate::client::Client;
use crate::config::{ConfKind, TopicConfig, TopicScope};
use crate::error::{ConfigError, KafkaClientError, Result};
use crate::handle::OwnedHandle;
use crate::util::{cstr_to_owned, err2string};

/// Let the partitioner pick the partition.
pub const PARTITION_UNASSIGNED: i32 = -1;

/// Owned `rd_kafka_topic_t`. Must not outlive the client it was created from.
#[derive(Debug)]
pub struct Topic {
    handle: OwnedHandle<rdsys::rd_kafka_topic_t>,
}

impl Topic {
    /// Create a topic handle. A supplied `config` is always consumed by the
    /// library, whether or not creation succeeds.
    pub fn new(client: &Client, name: &str, config: Option<TopicConfig>) -> Result<Self> {
        let name_c = CString::new(name).map_err(|_| {
            KafkaClientError::InvalidArgument(format!("topic name {:?} contains a NUL byte", name))
        })?;
        let conf = match config {
            Some(mut config) => {
                let conf = config.release_handle();
                if conf.is_null() {
                    return Err(KafkaClientError::Config(ConfigError::Released {
                        kind: TopicScope::NAME,
                    }));
                }
                conf.into_raw()
            }
            None => std::ptr::null_mut(),
        };

        let rkt = unsafe { rdsys::rd_kafka_topic_new(client.native_ptr(), name_c.as_ptr(), conf) };
        if rkt.is_null() {
            let err = unsafe { rdsys::rd_kafka_last_error() };
            return Err(KafkaClientError::TopicCreation {
                topic: name.to_string(),
                reason: err2string(err),
            });
        }
        debug!(topic = name, "topic handle created");
        Ok(Self {
            handle: unsafe { OwnedHandle::from_raw(rkt, rdsys::rd_kafka_topic_destroy) },
        })
    }

    pub fn name(&self) -> String {
        unsafe { cstr_to_owned(rdsys::rd_kafka_topic_name(self.handle.get())) }
    }

    pub fn native_ptr(&self) -> *mut rdsys::rd_kafka_topic_t {
        self.handle.get()
    }
}
