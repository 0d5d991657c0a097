use std::sync::Arc;

use crate::heartbeat::storage::HeartbeatStorage;
use crate::heartbeat::types::{today_utc, Heartbeat, HeartbeatInfo, HeartbeatsPayload};

/// Per-identity entry point for recording and draining heartbeats.
///
/// Recording is best-effort telemetry: at most one heartbeat is kept per UTC
/// day, and persistence failures are dropped. Draining is transactional via
/// the storage's blocking transform.
pub struct HeartbeatController {
    storage: Arc<HeartbeatStorage>,
}

impl HeartbeatController {
    /// Controller over the shared storage instance for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            storage: HeartbeatStorage::get_instance(id),
        }
    }

    /// Controller over an explicit storage instance.
    pub fn with_storage(storage: Arc<HeartbeatStorage>) -> Self {
        Self { storage }
    }

    /// Records a usage ping for `agent` dated today, unless one was already
    /// recorded today. Returns immediately; the write happens on the storage
    /// queue.
    pub fn log(&self, agent: &str) {
        let agent = agent.to_string();
        let date = today_utc();
        self.storage.read_and_write_async(move |info| {
            let mut info = info.unwrap_or_default();
            if !info.contains_date(&date) {
                info.append(Heartbeat::new(agent, date));
            }
            Some(info)
        });
    }

    /// Takes every stored heartbeat, leaving the log empty, and returns the
    /// payload. `None` when nothing was stored or persistence failed.
    pub fn flush(&self) -> Option<HeartbeatsPayload> {
        let flushed: Option<HeartbeatInfo> = self.storage.get_and_set(|_| None).ok()?;
        let flushed = flushed?;
        if flushed.is_empty() {
            None
        } else {
            Some(flushed.make_heartbeats_payload())
        }
    }
}
