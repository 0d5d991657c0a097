use std::sync::Arc;

use rand::{thread_rng, Rng};

use crate::sessions::settings::SessionsSettings;
use crate::sessions::types::SessionInfo;
use crate::sessions::LOGGER;

/// Produces session identifiers on demand.
///
/// The generator is responsible for:
///   1) generating the session id,
///   2) carrying the first session id of its lifetime forward, and
///   3) deciding per session whether events should be dispatched.
///
/// It holds in-memory state only and expects a single logical owner; callers
/// sharing a generator across threads must serialize access themselves.
pub struct SessionGenerator {
    settings: Arc<dyn SessionsSettings>,
    this_session: Option<SessionInfo>,
    first_session_id: Option<String>,
    session_index: i32,
}

impl SessionGenerator {
    pub fn new(settings: Arc<dyn SessionsSettings>) -> Self {
        Self {
            settings,
            this_session: None,
            first_session_id: None,
            // Incremented to 0 on the first generation.
            session_index: -1,
        }
    }

    /// Generates a new session. The id of the first session generated by
    /// this instance is carried forward on every later session.
    pub fn generate_new_session(&mut self) -> SessionInfo {
        let new_session_id = generate_session_id();

        // If a first session id is already recorded, keep it. Otherwise this
        // session becomes the first one.
        let first_session_id = self
            .first_session_id
            .clone()
            .unwrap_or_else(|| new_session_id.clone());

        self.session_index += 1;
        self.first_session_id = Some(first_session_id.clone());

        let mut dispatch_events = true;
        let draw: f64 = thread_rng().gen_range(0.0..1.0);
        if draw > self.settings.sampling_rate() {
            dispatch_events = false;
        }

        let new_session = SessionInfo {
            session_id: new_session_id,
            first_session_id,
            should_dispatch_events: dispatch_events,
            session_index: self.session_index,
        };
        LOGGER.debug(format!(
            "Generated session {} (index {})",
            new_session.session_id, new_session.session_index
        ));
        self.this_session = Some(new_session.clone());
        new_session
    }

    /// The most recently generated session, or `None` before the first
    /// generation.
    pub fn current_session(&self) -> Option<&SessionInfo> {
        self.this_session.as_ref()
    }
}

/// 128 random bits rendered as 32 lowercase hex characters. Uniqueness is
/// probabilistic; no coordination with any central authority.
fn generate_session_id() -> String {
    let bytes: [u8; 16] = thread_rng().gen();
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
