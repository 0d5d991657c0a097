//! Session lifecycle bookkeeping.
//!
//! Mirrors the session identifier handling of the Firebase Apple SDK's
//! `FirebaseSessions` module: a [`SessionGenerator`] hands out fresh session
//! ids on demand, carries the first id of the process lifetime forward, and
//! makes a per-session sampling decision for telemetry dispatch.

use std::sync::LazyLock;

use crate::logger::Logger;

mod generator;
mod settings;
mod types;

pub use generator::SessionGenerator;
pub use settings::{SessionsSettings, StaticSettings};
pub use types::SessionInfo;

pub(crate) static LOGGER: LazyLock<Logger> =
    LazyLock::new(|| Logger::new("@firebase/sessions"));
