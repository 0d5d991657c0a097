//! Durable heartbeat bookkeeping.
//!
//! Mirrors the Firebase Apple SDK's `HeartbeatLogging` module: a
//! [`HeartbeatStorage`] keeps a per-identity, capacity-bounded log of usage
//! pings behind a private serial queue, with pluggable persistence
//! ([`PersistentStorage`]) and codec ([`HeartbeatCoder`]) collaborators. A
//! process-wide registry deduplicates instances by identity without owning
//! them. [`HeartbeatController`] is the thin record/drain surface on top.

use std::sync::LazyLock;

use crate::logger::Logger;

mod coder;
mod controller;
pub mod error;
mod persistence;
mod storage;
#[cfg(test)]
pub(crate) mod test_support;
mod types;

pub use coder::{HeartbeatCoder, JsonHeartbeatCoder};
pub use controller::HeartbeatController;
pub use error::{HeartbeatError, HeartbeatErrorCode, HeartbeatResult};
pub use persistence::{FilePersistence, InMemoryPersistence, PersistentStorage};
pub use storage::HeartbeatStorage;
pub use types::{
    today_utc, AgentHeartbeats, Heartbeat, HeartbeatInfo, HeartbeatsPayload,
    DEFAULT_HEARTBEAT_CAPACITY,
};

pub(crate) static LOGGER: LazyLock<Logger> =
    LazyLock::new(|| Logger::new("@firebase/heartbeats"));
