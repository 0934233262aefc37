//! Messages returned by the consumer.

use std::fmt;
use std::os::raw::c_void;
use std::slice;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_resp_err_t;

use crate::handle::OwnedHandle;
use crate::util::{cstr_to_owned, err2string};

/// Owned `rd_kafka_message_t`. Never empty.
pub struct Message {
    handle: OwnedHandle<rdsys::rd_kafka_message_t>,
}

unsafe fn optional_bytes<'a>(ptr: *const c_void, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        Some(slice::from_raw_parts(ptr as *const u8, len))
    }
}

impl Message {
    /// Take ownership of a message returned by the library; `None` for null.
    ///
    /// # Safety
    /// A non-null `ptr` must be a message owned by nobody else.
    pub(crate) unsafe fn from_raw(ptr: *mut rdsys::rd_kafka_message_t) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        Some(Self {
            handle: OwnedHandle::from_raw(ptr, rdsys::rd_kafka_message_destroy),
        })
    }

    fn inner(&self) -> &rdsys::rd_kafka_message_t {
        unsafe { &*self.handle.get() }
    }

    pub fn payload(&self) -> Option<&[u8]> {
        let inner = self.inner();
        unsafe { optional_bytes(inner.payload, inner.len) }
    }

    pub fn key(&self) -> Option<&[u8]> {
        let inner = self.inner();
        unsafe { optional_bytes(inner.key, inner.key_len) }
    }

    pub fn partition(&self) -> i32 {
        self.inner().partition
    }

    pub fn offset(&self) -> i64 {
        self.inner().offset
    }

    pub fn topic_name(&self) -> String {
        let rkt = self.inner().rkt;
        if rkt.is_null() {
            return "unknown topic".to_string();
        }
        unsafe { cstr_to_owned(rdsys::rd_kafka_topic_name(rkt)) }
    }

    pub fn has_error(&self) -> bool {
        self.inner().err != rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR
    }

    /// Error carried by the message instead of a payload, if any. Prefers
    /// the text attached to the message over the generic code description.
    pub fn error(&self) -> Option<String> {
        if !self.has_error() {
            return None;
        }
        let text = unsafe { cstr_to_owned(rdsys::rd_kafka_message_errstr(self.handle.get())) };
        if text.is_empty() {
            Some(err2string(self.inner().err))
        } else {
            Some(text)
        }
    }

    pub fn is_unknown_topic_or_partition(&self) -> bool {
        matches!(
            self.inner().err,
            rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR__UNKNOWN_TOPIC
                | rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR__UNKNOWN_PARTITION
        )
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("topic", &self.topic_name())
            .field("partition", &self.partition())
            .field("offset", &self.offset())
            .field("error", &self.error())
            .finish()
    }
}
