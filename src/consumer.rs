//! Consumer: subscribe, consume messages, manage committed offsets, list
//! consumer groups.

use std::time::Duration;

use rdkafka::bindings as rdsys;
use tracing::debug;

use crate::client::{Client, ClientType};
use crate::config::GlobalConfig;
use crate::error::Result;
use crate::groups::{list_groups, GroupInfo};
use crate::message::Message;
use crate::offsets::{CommitMode, PartitionList, PartitionOffset, OFFSET_INVALID};
use crate::topic::PARTITION_UNASSIGNED;
use crate::util::{check_err, timeout_ms};

#[derive(Debug)]
pub struct Consumer {
    client: Client,
}

impl Consumer {
    /// Create a consumer and route the main queue to the consumer queue.
    /// The instance is destroyed again if the redirect fails.
    pub fn new(config: GlobalConfig) -> Result<Self> {
        let client = Client::new(ClientType::Consumer, config)?;
        let err = unsafe { rdsys::rd_kafka_poll_set_consumer(client.native_ptr()) };
        check_err("poll_set_consumer", err)?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Subscribe to `topics` (balanced group consumption).
    pub fn subscribe(&self, topics: &[&str]) -> Result<()> {
        let mut list = PartitionList::with_capacity(topics.len())?;
        for topic in topics {
            list.add(topic, PARTITION_UNASSIGNED, OFFSET_INVALID)?;
        }
        let err = unsafe { rdsys::rd_kafka_subscribe(self.client.native_ptr(), list.as_ptr()) };
        check_err("subscribe", err)
    }

    /// Next message or error event, `None` on timeout.
    pub fn consume(&self, timeout: Duration) -> Option<Message> {
        unsafe {
            Message::from_raw(rdsys::rd_kafka_consumer_poll(
                self.client.native_ptr(),
                timeout_ms(timeout),
            ))
        }
    }

    /// Leave the group, waiting for the final rebalance to revoke partitions.
    pub fn close(&self) -> Result<()> {
        let err = unsafe { rdsys::rd_kafka_consumer_close(self.client.native_ptr()) };
        check_err("consumer_close", err)
    }

    /// Committed offsets of the group for `partitions`. Partitions without a
    /// commit report [`OFFSET_INVALID`].
    pub fn committed(
        &self,
        partitions: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<Vec<PartitionOffset>> {
        let mut list = PartitionList::with_capacity(partitions.len())?;
        for (topic, partition) in partitions {
            list.add(topic, *partition, OFFSET_INVALID)?;
        }
        let err = unsafe {
            rdsys::rd_kafka_committed(self.client.native_ptr(), list.as_ptr(), timeout_ms(timeout))
        };
        check_err("committed", err)?;
        Ok(list.entries())
    }

    /// Commit `offsets` for the group.
    pub fn commit(&self, offsets: &[PartitionOffset], mode: CommitMode) -> Result<()> {
        let list = PartitionList::from_offsets(offsets)?;
        let async_ = match mode {
            CommitMode::Sync => 0,
            CommitMode::Async => 1,
        };
        let err = unsafe { rdsys::rd_kafka_commit(self.client.native_ptr(), list.as_ptr(), async_) };
        check_err("commit", err)?;
        debug!(count = offsets.len(), ?mode, "offsets committed");
        Ok(())
    }

    /// List `group`, or every group when `None`, with decoded member payloads.
    pub fn list_groups(&self, group: Option<&str>, timeout: Duration) -> Result<Vec<GroupInfo>> {
        list_groups(&self.client, group, timeout)
    }
}
