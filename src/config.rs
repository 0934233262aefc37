//! Global and per-topic client configuration backed by native config objects.

use std::cell::RefCell;
use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::ptr;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_conf_res_t;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::error_message::ErrorMessage;
use crate::handle::OwnedHandle;
use crate::util::{buffer_to_string, ERRSTR_SIZE};

mod sealed {
    pub trait Sealed {}
}

/// The two configuration kinds. Sealed: only [`GlobalScope`] and
/// [`TopicScope`] exist.
pub trait ConfKind: sealed::Sealed {
    /// Native configuration object.
    type Native;

    /// Name used in error messages.
    const NAME: &'static str;

    fn new_native() -> OwnedHandle<Self::Native>;

    /// # Safety
    /// `conf` must be a live native config; strings must be NUL-terminated and
    /// `errstr` must point to `errstr_size` writable bytes.
    unsafe fn set(
        conf: *mut Self::Native,
        name: *const c_char,
        value: *const c_char,
        errstr: *mut c_char,
        errstr_size: usize,
    ) -> rd_kafka_conf_res_t;

    /// # Safety
    /// `conf` must be a live native config; `dest` is null or points to
    /// `*dest_size` writable bytes.
    unsafe fn get(
        conf: *const Self::Native,
        name: *const c_char,
        dest: *mut c_char,
        dest_size: *mut usize,
    ) -> rd_kafka_conf_res_t;
}

/// Client-wide settings (`rd_kafka_conf_t`).
#[derive(Debug)]
pub enum GlobalScope {}

/// Per-topic settings (`rd_kafka_topic_conf_t`).
#[derive(Debug)]
pub enum TopicScope {}

impl sealed::Sealed for GlobalScope {}
impl sealed::Sealed for TopicScope {}

impl ConfKind for GlobalScope {
    type Native = rdsys::rd_kafka_conf_t;
    const NAME: &'static str = "GlobalConfig";

    fn new_native() -> OwnedHandle<Self::Native> {
        unsafe { OwnedHandle::from_raw(rdsys::rd_kafka_conf_new(), rdsys::rd_kafka_conf_destroy) }
    }

    unsafe fn set(
        conf: *mut Self::Native,
        name: *const c_char,
        value: *const c_char,
        errstr: *mut c_char,
        errstr_size: usize,
    ) -> rd_kafka_conf_res_t {
        rdsys::rd_kafka_conf_set(conf, name, value, errstr, errstr_size)
    }

    unsafe fn get(
        conf: *const Self::Native,
        name: *const c_char,
        dest: *mut c_char,
        dest_size: *mut usize,
    ) -> rd_kafka_conf_res_t {
        rdsys::rd_kafka_conf_get(conf, name, dest, dest_size)
    }
}

impl ConfKind for TopicScope {
    type Native = rdsys::rd_kafka_topic_conf_t;
    const NAME: &'static str = "TopicConfig";

    fn new_native() -> OwnedHandle<Self::Native> {
        unsafe {
            OwnedHandle::from_raw(
                rdsys::rd_kafka_topic_conf_new(),
                rdsys::rd_kafka_topic_conf_destroy,
            )
        }
    }

    unsafe fn set(
        conf: *mut Self::Native,
        name: *const c_char,
        value: *const c_char,
        errstr: *mut c_char,
        errstr_size: usize,
    ) -> rd_kafka_conf_res_t {
        rdsys::rd_kafka_topic_conf_set(conf, name, value, errstr, errstr_size)
    }

    unsafe fn get(
        conf: *const Self::Native,
        name: *const c_char,
        dest: *mut c_char,
        dest_size: *mut usize,
    ) -> rd_kafka_conf_res_t {
        rdsys::rd_kafka_topic_conf_get(conf, name, dest, dest_size)
    }
}

/// Configuration object of kind `K`.
///
/// `put`/`get` report failure through their return value and record a
/// description that [`error`](Config::error) returns until the next failure.
/// `try_put`/`try_get` return the same failures as a typed `Result` instead.
pub struct Config<K: ConfKind> {
    handle: OwnedHandle<K::Native>,
    error: RefCell<ErrorMessage>,
    _kind: PhantomData<K>,
}

pub type GlobalConfig = Config<GlobalScope>;
pub type TopicConfig = Config<TopicScope>;

fn conf_res_reason(res: rd_kafka_conf_res_t) -> &'static str {
    match res {
        rd_kafka_conf_res_t::RD_KAFKA_CONF_UNKNOWN => "Unknown or unset configuration property",
        rd_kafka_conf_res_t::RD_KAFKA_CONF_INVALID => "Invalid configuration value",
        _ => "OK",
    }
}

impl<K: ConfKind> Config<K> {
    pub fn new() -> Self {
        Self {
            handle: K::new_native(),
            error: RefCell::new(ErrorMessage::new()),
            _kind: PhantomData,
        }
    }

    /// Set `key` to `value`. Returns false and records the reason on failure.
    pub fn put(&mut self, key: &str, value: &str) -> bool {
        match self.try_put(key, value) {
            Ok(()) => true,
            Err(err) => {
                self.record(&err);
                false
            }
        }
    }

    pub fn try_put(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if self.handle.is_null() {
            return Err(ConfigError::Released { kind: K::NAME });
        }
        let nul_byte = || ConfigError::NulByte {
            kind: K::NAME,
            key: key.replace('\0', "\\0"),
        };
        let key_c = CString::new(key).map_err(|_| nul_byte())?;
        let value_c = CString::new(value).map_err(|_| nul_byte())?;

        let mut errstr = [0u8; ERRSTR_SIZE];
        let res = unsafe {
            K::set(
                self.handle.get(),
                key_c.as_ptr(),
                value_c.as_ptr(),
                errstr.as_mut_ptr() as *mut c_char,
                errstr.len(),
            )
        };
        if res != rd_kafka_conf_res_t::RD_KAFKA_CONF_OK {
            let mut reason = buffer_to_string(&errstr);
            if reason.is_empty() {
                reason = conf_res_reason(res).to_string();
            }
            return Err(ConfigError::Rejected {
                kind: K::NAME,
                key: key.to_string(),
                value: value.to_string(),
                reason,
            });
        }
        debug!(kind = K::NAME, key, value, "config put");
        Ok(())
    }

    /// Value of `key`, or an empty string (with the reason recorded) on
    /// failure. [`try_get`](Self::try_get) reports the failure as a value.
    pub fn get(&self, key: &str) -> String {
        self.try_get(key).unwrap_or_else(|err| {
            self.record(&err);
            String::new()
        })
    }

    /// Value of `key` as stored by the library.
    ///
    /// A known property without a value (`group.id` on a fresh config) is
    /// reported as a [`ConfigError::Lookup`], the same as an unknown name.
    /// Putting an empty string resets a property to its default, so a later
    /// read returns the default rather than `""`.
    pub fn try_get(&self, key: &str) -> Result<String, ConfigError> {
        if self.handle.is_null() {
            return Err(ConfigError::Released { kind: K::NAME });
        }
        let key_c = CString::new(key).map_err(|_| ConfigError::NulByte {
            kind: K::NAME,
            key: key.replace('\0', "\\0"),
        })?;
        let lookup_err = |res| ConfigError::Lookup {
            kind: K::NAME,
            key: key.to_string(),
            reason: conf_res_reason(res).to_string(),
        };

        // First ask for the size, then fetch into a buffer of exactly that size.
        let mut size = 0usize;
        let res = unsafe { K::get(self.handle.get(), key_c.as_ptr(), ptr::null_mut(), &mut size) };
        if res != rd_kafka_conf_res_t::RD_KAFKA_CONF_OK {
            return Err(lookup_err(res));
        }

        let mut buf = vec![0u8; size];
        let res = unsafe {
            K::get(
                self.handle.get(),
                key_c.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                &mut size,
            )
        };
        if res != rd_kafka_conf_res_t::RD_KAFKA_CONF_OK {
            return Err(lookup_err(res));
        }
        Ok(buffer_to_string(&buf))
    }

    /// Last recorded error. Meaningless before any failing call.
    pub fn error(&self) -> String {
        self.error.borrow().text().to_string()
    }

    /// Move the native object out. Afterwards every put/get fails with
    /// [`ConfigError::Released`].
    pub fn release_handle(&mut self) -> OwnedHandle<K::Native> {
        debug!(kind = K::NAME, "releasing native config");
        self.handle.take()
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_null()
    }

    /// Borrowed native pointer, null after release.
    pub fn native_ptr(&self) -> *mut K::Native {
        self.handle.get()
    }

    fn record(&self, err: &ConfigError) {
        warn!(kind = K::NAME, error = %err, "config operation failed");
        self.error.borrow_mut().format(format_args!("{}", err));
    }
}

impl GlobalConfig {
    /// Hand `topic` over as the default topic configuration. The topic
    /// config's native object is owned by this config afterwards.
    pub fn set_default_topic_config(&mut self, mut topic: TopicConfig) -> bool {
        if self.handle.is_null() {
            self.record(&ConfigError::Released {
                kind: GlobalScope::NAME,
            });
            return false;
        }
        let topic_handle = topic.release_handle();
        if topic_handle.is_null() {
            self.record(&ConfigError::Released {
                kind: TopicScope::NAME,
            });
            return false;
        }
        unsafe {
            rdsys::rd_kafka_conf_set_default_topic_conf(self.handle.get(), topic_handle.into_raw())
        };
        debug!("default topic config attached");
        true
    }
}

impl<K: ConfKind> Default for Config<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ConfKind> fmt::Debug for Config<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("handle", &self.handle)
            .field("error", &self.error.borrow().text())
            .finish()
    }
}
