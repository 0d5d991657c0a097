use crate::heartbeat::error::{decode_failed, encode_failed, HeartbeatResult};
use crate::heartbeat::types::HeartbeatInfo;

/// Converts between raw stored bytes and a structured heartbeat log.
pub trait HeartbeatCoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> HeartbeatResult<HeartbeatInfo>;
    fn encode(&self, info: &HeartbeatInfo) -> HeartbeatResult<Vec<u8>>;
}

/// Default codec; stores the log as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonHeartbeatCoder;

impl HeartbeatCoder for JsonHeartbeatCoder {
    fn decode(&self, data: &[u8]) -> HeartbeatResult<HeartbeatInfo> {
        serde_json::from_slice(data)
            .map_err(|err| decode_failed(format!("Malformed heartbeat data: {err}")))
    }

    fn encode(&self, info: &HeartbeatInfo) -> HeartbeatResult<Vec<u8>> {
        serde_json::to_vec(info)
            .map_err(|err| encode_failed(format!("Failed to serialize heartbeat data: {err}")))
    }
}
