//! Topic-partition lists used for subscriptions and offset commits.

use std::ffi::CString;
use std::os::raw::c_int;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_resp_err_t;

use crate::error::{KafkaClientError, Result};
use crate::handle::OwnedHandle;
use crate::util::{cstr_to_owned, err2string, last_error, native_slice};

/// Offset the library reports when none is known.
pub const OFFSET_INVALID: i64 = rdsys::RD_KAFKA_OFFSET_INVALID as i64;

/// One topic partition with its offset and per-partition error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOffset {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub error: Option<String>,
}

impl PartitionOffset {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            error: None,
        }
    }
}

/// Whether [`commit`](crate::Consumer::commit) waits for the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    Sync,
    Async,
}

/// Owned `rd_kafka_topic_partition_list_t`.
#[derive(Debug)]
pub(crate) struct PartitionList {
    handle: OwnedHandle<rdsys::rd_kafka_topic_partition_list_t>,
}

impl PartitionList {
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        let size = capacity.min(c_int::MAX as usize) as c_int;
        let handle = unsafe {
            OwnedHandle::from_raw(
                rdsys::rd_kafka_topic_partition_list_new(size),
                rdsys::rd_kafka_topic_partition_list_destroy,
            )
        };
        if handle.is_null() {
            return Err(last_error("topic_partition_list_new"));
        }
        Ok(Self { handle })
    }

    /// Append `topic`/`partition` with `offset`.
    pub(crate) fn add(&mut self, topic: &str, partition: i32, offset: i64) -> Result<()> {
        let topic_c = CString::new(topic).map_err(|_| {
            KafkaClientError::InvalidArgument(format!("topic name {:?} contains a NUL byte", topic))
        })?;
        unsafe {
            let elem = rdsys::rd_kafka_topic_partition_list_add(
                self.handle.get(),
                topic_c.as_ptr(),
                partition,
            );
            if elem.is_null() {
                return Err(last_error("topic_partition_list_add"));
            }
            (*elem).offset = offset;
        }
        Ok(())
    }

    pub(crate) fn from_offsets(offsets: &[PartitionOffset]) -> Result<Self> {
        let mut list = Self::with_capacity(offsets.len())?;
        for entry in offsets {
            list.add(&entry.topic, entry.partition, entry.offset)?;
        }
        Ok(list)
    }

    /// Copy of every element, in list order.
    pub(crate) fn entries(&self) -> Vec<PartitionOffset> {
        unsafe {
            let native = &*self.handle.get();
            native_slice(native.elems as *const rdsys::rd_kafka_topic_partition_t, native.cnt)
                .iter()
                .map(|elem| PartitionOffset {
                    topic: cstr_to_owned(elem.topic),
                    partition: elem.partition,
                    offset: elem.offset,
                    error: (elem.err != rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR)
                        .then(|| err2string(elem.err)),
                })
                .collect()
        }
    }

    pub(crate) fn as_ptr(&self) -> *mut rdsys::rd_kafka_topic_partition_list_t {
        self.handle.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order_and_offsets() {
        let mut list = PartitionList::with_capacity(2).unwrap();
        list.add("orders", 0, 42).unwrap();
        list.add("orders", 3, OFFSET_INVALID).unwrap();
        list.add("audit", 1, 7).unwrap();

        let entries = list.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], PartitionOffset::new("orders", 0, 42));
        assert_eq!(entries[1].offset, OFFSET_INVALID);
        assert_eq!(entries[2].topic, "audit");
        assert!(entries.iter().all(|e| e.error.is_none()));
    }

    #[test]
    fn empty_list_has_no_entries() {
        let list = PartitionList::with_capacity(0).unwrap();
        assert!(list.entries().is_empty());
    }

    #[test]
    fn from_offsets_round_trips() {
        let offsets = vec![
            PartitionOffset::new("t", 0, 10),
            PartitionOffset::new("t", 1, 20),
        ];
        let list = PartitionList::from_offsets(&offsets).unwrap();
        assert_eq!(list.entries(), offsets);
    }

    #[test]
    fn topic_with_nul_is_rejected() {
        let mut list = PartitionList::with_capacity(1).unwrap();
        assert!(matches!(
            list.add("a\0b", 0, 0),
            Err(KafkaClientError::InvalidArgument(_))
        ));
        assert!(list.entries().is_empty());
    }
}
