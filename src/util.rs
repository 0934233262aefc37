//! Small helpers shared by the native wrappers.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::slice;
use std::time::Duration;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_resp_err_t;

use crate::error::{KafkaClientError, Result};

/// Size of the error buffers handed to native calls.
pub(crate) const ERRSTR_SIZE: usize = 512;

/// Text of a NUL-terminated buffer filled by the native library.
pub(crate) fn buffer_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Owned copy of a native C string; empty for null.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated string.
pub(crate) unsafe fn cstr_to_owned(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

pub(crate) fn err2string(err: rd_kafka_resp_err_t) -> String {
    unsafe { cstr_to_owned(rdsys::rd_kafka_err2str(err)) }
}

pub(crate) fn kafka_error(operation: &'static str, err: rd_kafka_resp_err_t) -> KafkaClientError {
    KafkaClientError::Kafka {
        operation,
        code: err as i32,
        reason: err2string(err),
    }
}

pub(crate) fn check_err(operation: &'static str, err: rd_kafka_resp_err_t) -> Result<()> {
    if err == rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR {
        Ok(())
    } else {
        Err(kafka_error(operation, err))
    }
}

/// Error for a native call that signalled failure through the thread's last error.
pub(crate) fn last_error(operation: &'static str) -> KafkaClientError {
    kafka_error(operation, unsafe { rdsys::rd_kafka_last_error() })
}

pub(crate) fn timeout_ms(timeout: Duration) -> c_int {
    timeout.as_millis().min(c_int::MAX as u128) as c_int
}

/// Borrow a native array; empty for null or non-positive counts.
///
/// # Safety
/// A non-null `ptr` must point to at least `count` initialized values that
/// outlive `'a`.
pub(crate) unsafe fn native_slice<'a, T>(ptr: *const T, count: c_int) -> &'a [T] {
    if ptr.is_null() || count <= 0 {
        return &[];
    }
    slice::from_raw_parts(ptr, count as usize)
}
