//! Test doubles shared by the heartbeat test modules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::heartbeat::coder::{HeartbeatCoder, JsonHeartbeatCoder};
use crate::heartbeat::error::{
    decode_failed, encode_failed, read_failed, write_failed, HeartbeatResult,
};
use crate::heartbeat::persistence::PersistentStorage;
use crate::heartbeat::types::HeartbeatInfo;

/// In-memory storage slot whose next read or write can be made to fail.
#[derive(Default)]
pub(crate) struct StorageFake {
    data: Mutex<Option<Vec<u8>>>,
    fail_on_next_read: AtomicBool,
    fail_on_next_write: AtomicBool,
}

impl StorageFake {
    pub(crate) fn stored(&self) -> Option<Vec<u8>> {
        self.data.lock().unwrap().clone()
    }

    pub(crate) fn fail_next_read(&self) {
        self.fail_on_next_read.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_write(&self) {
        self.fail_on_next_write.store(true, Ordering::SeqCst);
    }
}

impl PersistentStorage for StorageFake {
    fn read(&self) -> HeartbeatResult<Vec<u8>> {
        if self.fail_on_next_read.swap(false, Ordering::SeqCst) {
            return Err(read_failed("Simulated read failure"));
        }
        self.data
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| read_failed("No heartbeat data stored"))
    }

    fn write(&self, value: Option<&[u8]>) -> HeartbeatResult<()> {
        if self.fail_on_next_write.swap(false, Ordering::SeqCst) {
            return Err(write_failed("Simulated write failure"));
        }
        *self.data.lock().unwrap() = value.map(<[u8]>::to_vec);
        Ok(())
    }
}

/// JSON codec whose next encode or decode can be made to fail.
#[derive(Default)]
pub(crate) struct CoderFake {
    inner: JsonHeartbeatCoder,
    fail_on_next_decode: AtomicBool,
    fail_on_next_encode: AtomicBool,
}

impl CoderFake {
    pub(crate) fn fail_next_decode(&self) {
        self.fail_on_next_decode.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_encode(&self) {
        self.fail_on_next_encode.store(true, Ordering::SeqCst);
    }
}

impl HeartbeatCoder for CoderFake {
    fn decode(&self, data: &[u8]) -> HeartbeatResult<HeartbeatInfo> {
        if self.fail_on_next_decode.swap(false, Ordering::SeqCst) {
            return Err(decode_failed("Simulated decode failure"));
        }
        self.inner.decode(data)
    }

    fn encode(&self, info: &HeartbeatInfo) -> HeartbeatResult<Vec<u8>> {
        if self.fail_on_next_encode.swap(false, Ordering::SeqCst) {
            return Err(encode_failed("Simulated encode failure"));
        }
        self.inner.encode(info)
    }
}
