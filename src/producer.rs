//! Producer: enqueue payloads on topics of a native producer instance.

use std::os::raw::{c_int, c_void};
use std::ptr;
use std::time::Duration;

use rdkafka::bindings as rdsys;

use crate::client::{Client, ClientType};
use crate::config::{GlobalConfig, TopicConfig};
use crate::error::Result;
use crate::topic::{Topic, PARTITION_UNASSIGNED};
use crate::util::{check_err, last_error, timeout_ms};

#[derive(Debug)]
pub struct Producer {
    client: Client,
    partition: i32,
}

impl Producer {
    pub fn new(config: GlobalConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(ClientType::Producer, config)?,
            partition: PARTITION_UNASSIGNED,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn topic(&self, name: &str, config: Option<TopicConfig>) -> Result<Topic> {
        Topic::new(&self.client, name, config)
    }

    /// Fixed partition for subsequent messages; [`PARTITION_UNASSIGNED`] to
    /// use the partitioner.
    pub fn set_partition(&mut self, partition: i32) {
        self.partition = partition;
    }

    /// Enqueue one message. The payload and key are copied.
    pub fn produce(&self, topic: &Topic, payload: &[u8], key: Option<&[u8]>) -> Result<()> {
        let (key_ptr, key_len) = match key {
            Some(key) => (key.as_ptr() as *const c_void, key.len()),
            None => (ptr::null(), 0),
        };
        let ret = unsafe {
            rdsys::rd_kafka_produce(
                topic.native_ptr(),
                self.partition,
                rdsys::RD_KAFKA_MSG_F_COPY as c_int,
                payload.as_ptr() as *mut c_void,
                payload.len(),
                key_ptr,
                key_len,
                ptr::null_mut(),
            )
        };
        if ret != 0 {
            return Err(last_error("produce"));
        }
        Ok(())
    }

    pub fn poll(&self, timeout: Duration) -> i32 {
        self.client.poll(timeout)
    }

    /// Wait until every queued message has been delivered or failed.
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        let err = unsafe { rdsys::rd_kafka_flush(self.client.native_ptr(), timeout_ms(timeout)) };
        check_err("flush", err)
    }
}
