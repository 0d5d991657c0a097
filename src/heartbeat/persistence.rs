use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use percent_encoding::{percent_encode, NON_ALPHANUMERIC};

use crate::heartbeat::error::{read_failed, write_failed, HeartbeatResult};

/// Opaque byte-blob slot backing a heartbeat log.
///
/// Absence of stored data is a read failure; callers that want "empty"
/// semantics map the error themselves.
pub trait PersistentStorage: Send + Sync {
    fn read(&self) -> HeartbeatResult<Vec<u8>>;
    /// Replaces the stored bytes; `None` clears the slot.
    fn write(&self, value: Option<&[u8]>) -> HeartbeatResult<()>;
}

/// File-backed storage slot, one file per identity.
#[derive(Clone, Debug)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Storage under `base_dir` for the given identity. The directory is
    /// created on the first write, so construction cannot fail.
    pub fn new(base_dir: PathBuf, id: &str) -> Self {
        let encoded = percent_encode(id.as_bytes(), NON_ALPHANUMERIC).to_string();
        Self {
            path: base_dir.join(format!("heartbeats-{encoded}.json")),
        }
    }

    /// Storage under the default cache directory for the given identity.
    pub fn default_for_id(id: &str) -> Self {
        Self::new(default_cache_dir(), id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FIREBASE_HEARTBEATS_CACHE_DIR") {
        return PathBuf::from(dir);
    }

    match std::env::current_dir() {
        Ok(dir) => dir.join(".firebase/heartbeats"),
        Err(_) => std::env::temp_dir().join("firebase-heartbeats"),
    }
}

impl PersistentStorage for FilePersistence {
    fn read(&self) -> HeartbeatResult<Vec<u8>> {
        fs::read(&self.path).map_err(|err| {
            read_failed(format!(
                "Failed to read heartbeat data '{}': {}",
                self.path.display(),
                err
            ))
        })
    }

    fn write(&self, value: Option<&[u8]>) -> HeartbeatResult<()> {
        match value {
            Some(data) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).map_err(|err| {
                        write_failed(format!(
                            "Failed to create heartbeat cache directory '{}': {}",
                            parent.display(),
                            err
                        ))
                    })?;
                }
                fs::write(&self.path, data).map_err(|err| {
                    write_failed(format!(
                        "Failed to write heartbeat data '{}': {}",
                        self.path.display(),
                        err
                    ))
                })
            }
            None => {
                if self.path.exists() {
                    fs::remove_file(&self.path).map_err(|err| {
                        write_failed(format!(
                            "Failed to delete heartbeat data '{}': {}",
                            self.path.display(),
                            err
                        ))
                    })?;
                }
                Ok(())
            }
        }
    }
}

/// Process-local storage slot for callers that do not want disk persistence.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    data: Mutex<Option<Vec<u8>>>,
}

impl PersistentStorage for InMemoryPersistence {
    fn read(&self) -> HeartbeatResult<Vec<u8>> {
        self.data
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
            .ok_or_else(|| read_failed("No heartbeat data stored"))
    }

    fn write(&self, value: Option<&[u8]>) -> HeartbeatResult<()> {
        *self
            .data
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()) = value.map(<[u8]>::to_vec);
        Ok(())
    }
}
