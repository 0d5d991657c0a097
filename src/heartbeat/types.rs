use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Number of heartbeats retained by a log built with `HeartbeatInfo::default()`.
pub const DEFAULT_HEARTBEAT_CAPACITY: usize = 30;

const HEARTBEATS_PAYLOAD_VERSION: u32 = 2;

/// A single usage ping: an agent/version identifier and the UTC day it was
/// recorded on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub agent: String,
    /// `%Y-%m-%d`.
    pub date: String,
}

impl Heartbeat {
    pub fn new(agent: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            date: date.into(),
        }
    }
}

/// Current UTC day in the format heartbeats are recorded with.
pub fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Ordered, capacity-bounded collection of heartbeats, oldest first.
///
/// Once the log is at capacity, appending evicts the oldest entry (the front
/// of the insertion order) before pushing the new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatInfo {
    capacity: usize,
    heartbeats: Vec<Heartbeat>,
}

impl HeartbeatInfo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heartbeats: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn heartbeats(&self) -> &[Heartbeat] {
        &self.heartbeats
    }

    pub fn len(&self) -> usize {
        self.heartbeats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heartbeats.is_empty()
    }

    /// Whether a heartbeat dated `date` is already recorded.
    pub fn contains_date(&self, date: &str) -> bool {
        self.heartbeats.iter().any(|heartbeat| heartbeat.date == date)
    }

    /// Appends a heartbeat, evicting the oldest entry once at capacity. A
    /// zero-capacity log stores nothing.
    pub fn append(&mut self, heartbeat: Heartbeat) {
        if self.capacity == 0 {
            return;
        }
        if self.heartbeats.len() >= self.capacity {
            self.heartbeats.remove(0);
        }
        self.heartbeats.push(heartbeat);
    }

    /// Deterministic projection of the log: entries grouped by agent, agents
    /// ordered by name, dates ascending within each agent. Suitable both for
    /// equality comparison and for producing outgoing payloads.
    pub fn make_heartbeats_payload(&self) -> HeartbeatsPayload {
        let mut by_agent: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for heartbeat in &self.heartbeats {
            by_agent
                .entry(&heartbeat.agent)
                .or_default()
                .push(heartbeat.date.clone());
        }

        let heartbeats = by_agent
            .into_iter()
            .map(|(agent, mut dates)| {
                dates.sort();
                AgentHeartbeats {
                    agent: agent.to_string(),
                    dates,
                }
            })
            .collect();

        HeartbeatsPayload {
            version: HEARTBEATS_PAYLOAD_VERSION,
            heartbeats,
        }
    }
}

impl Default for HeartbeatInfo {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_CAPACITY)
    }
}

/// Days on which a given agent recorded a heartbeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentHeartbeats {
    pub agent: String,
    pub dates: Vec<String>,
}

/// Outgoing summary of a heartbeat log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeartbeatsPayload {
    pub version: u32,
    pub heartbeats: Vec<AgentHeartbeats>,
}

impl HeartbeatsPayload {
    pub fn is_empty(&self) -> bool {
        self.heartbeats.is_empty()
    }

    /// The payload JSON encoded as unpadded base64url, suitable for an HTTP
    /// header value.
    pub fn header_value(&self) -> String {
        let serialized = serde_json::to_string(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_evicts_oldest_when_at_capacity() {
        let mut info = HeartbeatInfo::new(1);
        info.append(Heartbeat::new("agent/1", "2024-01-01"));
        info.append(Heartbeat::new("agent/1", "2024-01-02"));

        assert_eq!(info.len(), 1);
        assert_eq!(info.heartbeats()[0].date, "2024-01-02");
    }

    #[test]
    fn append_keeps_insertion_order_below_capacity() {
        let mut info = HeartbeatInfo::new(3);
        info.append(Heartbeat::new("agent/1", "2024-01-02"));
        info.append(Heartbeat::new("agent/1", "2024-01-01"));

        let dates: Vec<_> = info.heartbeats().iter().map(|h| h.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn zero_capacity_log_stores_nothing() {
        let mut info = HeartbeatInfo::new(0);
        info.append(Heartbeat::new("agent/1", "2024-01-01"));
        assert!(info.is_empty());
    }

    #[test]
    fn contains_date_matches_recorded_days() {
        let mut info = HeartbeatInfo::default();
        info.append(Heartbeat::new("agent/1", "2024-01-01"));
        assert!(info.contains_date("2024-01-01"));
        assert!(!info.contains_date("2024-01-02"));
    }

    #[test]
    fn payload_groups_by_agent_and_sorts() {
        let mut info = HeartbeatInfo::default();
        info.append(Heartbeat::new("agent/b", "2024-01-02"));
        info.append(Heartbeat::new("agent/a", "2024-01-03"));
        info.append(Heartbeat::new("agent/b", "2024-01-01"));

        let payload = info.make_heartbeats_payload();
        assert_eq!(payload.version, 2);
        assert_eq!(payload.heartbeats.len(), 2);
        assert_eq!(payload.heartbeats[0].agent, "agent/a");
        assert_eq!(payload.heartbeats[0].dates, ["2024-01-03"]);
        assert_eq!(payload.heartbeats[1].agent, "agent/b");
        assert_eq!(payload.heartbeats[1].dates, ["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn payload_is_insertion_order_independent() {
        let mut first = HeartbeatInfo::default();
        first.append(Heartbeat::new("agent/a", "2024-01-01"));
        first.append(Heartbeat::new("agent/b", "2024-01-02"));

        let mut second = HeartbeatInfo::default();
        second.append(Heartbeat::new("agent/b", "2024-01-02"));
        second.append(Heartbeat::new("agent/a", "2024-01-01"));

        assert_eq!(first.make_heartbeats_payload(), second.make_heartbeats_payload());
    }

    #[test]
    fn header_value_round_trips_through_base64() {
        let mut info = HeartbeatInfo::default();
        info.append(Heartbeat::new("agent/1", "2024-01-01"));

        let header = info.make_heartbeats_payload().header_value();
        let decoded = URL_SAFE_NO_PAD.decode(header).expect("valid base64url");
        let value: serde_json::Value = serde_json::from_slice(&decoded).expect("valid json");
        assert_eq!(value["version"], 2);
        assert_eq!(value["heartbeats"][0]["agent"], "agent/1");
    }
}
