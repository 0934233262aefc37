//! Native client instance built from a [`GlobalConfig`].

use std::fmt;
use std::os::raw::c_char;
use std::time::Duration;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_type_t;
use tracing::{info, warn};

use crate::config::{ConfKind, GlobalConfig, GlobalScope};
use crate::error::{ConfigError, KafkaClientError, Result};
use crate::handle::OwnedHandle;
use crate::util::{buffer_to_string, cstr_to_owned, timeout_ms, ERRSTR_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Producer,
    Consumer,
}

impl ClientType {
    fn native(self) -> rd_kafka_type_t {
        match self {
            ClientType::Producer => rd_kafka_type_t::RD_KAFKA_PRODUCER,
            ClientType::Consumer => rd_kafka_type_t::RD_KAFKA_CONSUMER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClientType::Producer => "producer",
            ClientType::Consumer => "consumer",
        }
    }
}

/// Owned `rd_kafka_t`. Destroyed on drop.
pub struct Client {
    handle: OwnedHandle<rdsys::rd_kafka_t>,
    client_type: ClientType,
}

impl Client {
    /// Create a client, moving `config` into the native library.
    ///
    /// The library only takes the configuration on success; on failure it is
    /// destroyed here and the library's error text is returned.
    pub fn new(client_type: ClientType, mut config: GlobalConfig) -> Result<Self> {
        let mut conf = config.release_handle();
        if conf.is_null() {
            return Err(KafkaClientError::Config(ConfigError::Released {
                kind: GlobalScope::NAME,
            }));
        }

        let mut errstr = [0u8; ERRSTR_SIZE];
        let rk = unsafe {
            rdsys::rd_kafka_new(
                client_type.native(),
                conf.get(),
                errstr.as_mut_ptr() as *mut c_char,
                errstr.len(),
            )
        };
        if rk.is_null() {
            let reason = buffer_to_string(&errstr);
            warn!(kind = client_type.as_str(), %reason, "client creation failed");
            return Err(KafkaClientError::ClientCreation {
                kind: client_type.as_str(),
                reason,
            });
        }
        // Owned by the client instance from here on.
        let _ = conf.release();

        let client = Self {
            handle: unsafe { OwnedHandle::from_raw(rk, rdsys::rd_kafka_destroy) },
            client_type,
        };
        info!(name = %client.name(), "created {}", client_type.as_str());
        Ok(client)
    }

    pub fn client_type(&self) -> ClientType {
        self.client_type
    }

    /// Instance name assigned by the library, e.g. `rdkafka#producer-1`.
    pub fn name(&self) -> String {
        unsafe { cstr_to_owned(rdsys::rd_kafka_name(self.handle.get())) }
    }

    /// Serve queued callbacks; returns the number of events served.
    pub fn poll(&self, timeout: Duration) -> i32 {
        unsafe { rdsys::rd_kafka_poll(self.handle.get(), timeout_ms(timeout)) }
    }

    /// Borrowed native pointer, valid while `self` lives.
    pub fn native_ptr(&self) -> *mut rdsys::rd_kafka_t {
        self.handle.get()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("type", &self.client_type)
            .field("name", &self.name())
            .finish()
    }
}
