#![doc = include_str!("../README.md")]

pub mod heartbeat;
pub mod logger;
pub mod sessions;
