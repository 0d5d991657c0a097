use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeartbeatErrorCode {
    ReadFailed,
    WriteFailed,
    DecodeFailed,
    EncodeFailed,
    Internal,
}

impl HeartbeatErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartbeatErrorCode::ReadFailed => "heartbeats/read-failed",
            HeartbeatErrorCode::WriteFailed => "heartbeats/write-failed",
            HeartbeatErrorCode::DecodeFailed => "heartbeats/decode-failed",
            HeartbeatErrorCode::EncodeFailed => "heartbeats/encode-failed",
            HeartbeatErrorCode::Internal => "heartbeats/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeartbeatError {
    pub code: HeartbeatErrorCode,
    message: String,
}

impl HeartbeatError {
    pub fn new(code: HeartbeatErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl Display for HeartbeatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for HeartbeatError {}

pub type HeartbeatResult<T> = Result<T, HeartbeatError>;

pub fn read_failed(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorCode::ReadFailed, message)
}

pub fn write_failed(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorCode::WriteFailed, message)
}

pub fn decode_failed(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorCode::DecodeFailed, message)
}

pub fn encode_failed(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorCode::EncodeFailed, message)
}

pub fn internal_error(message: impl Into<String>) -> HeartbeatError {
    HeartbeatError::new(HeartbeatErrorCode::Internal, message)
}
