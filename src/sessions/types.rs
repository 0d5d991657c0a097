/// Snapshot of a generated session.
///
/// Values are immutable once created; regenerating a session produces a new
/// `SessionInfo` rather than mutating the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    /// Freshly generated identifier, 32 lowercase hex characters.
    pub session_id: String,
    /// Identifier of the first session generated during the owning
    /// generator's lifetime.
    pub first_session_id: String,
    /// Whether this session was sampled in for event dispatch.
    pub should_dispatch_events: bool,
    /// Ordinal of this session, starting at 0 for the first generation.
    pub session_index: i32,
}
