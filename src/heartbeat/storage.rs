use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, Weak};
use std::thread::{self, JoinHandle};

use crate::heartbeat::coder::{HeartbeatCoder, JsonHeartbeatCoder};
use crate::heartbeat::error::{internal_error, HeartbeatResult};
use crate::heartbeat::persistence::{FilePersistence, PersistentStorage};
use crate::heartbeat::types::HeartbeatInfo;
use crate::heartbeat::LOGGER;

static INSTANCES: LazyLock<Mutex<HashMap<String, Weak<HeartbeatStorage>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn instances_guard() -> MutexGuard<'static, HashMap<String, Weak<HeartbeatStorage>>> {
    INSTANCES.lock().unwrap_or_else(|poison| poison.into_inner())
}

type Job = Box<dyn FnOnce() + Send>;

/// One-at-a-time task runner backing a storage instance. Jobs run on a
/// dedicated worker thread in submission order; dropping the queue drains
/// pending jobs and joins the worker.
struct SerialQueue {
    sender: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialQueue {
    fn new() -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker = thread::spawn(move || {
            while let Ok(job) = receiver.recv() {
                job();
            }
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    fn submit(&self, job: Job) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(job);
        }
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Per-identity durable log of recent heartbeats.
///
/// Every read-modify-write cycle, whether submitted through
/// [`read_and_write_async`](Self::read_and_write_async) or
/// [`get_and_set`](Self::get_and_set), runs on the instance's private
/// serial queue, one at a time, in submission order. No two transforms ever
/// observe overlapping storage contents, so lost updates between concurrent
/// submitters cannot occur.
///
/// Calling [`get_and_set`](Self::get_and_set) from inside a running
/// transform is undefined (the queue is occupied; the nested call would wait
/// on itself).
pub struct HeartbeatStorage {
    id: String,
    storage: Arc<dyn PersistentStorage>,
    coder: Arc<dyn HeartbeatCoder>,
    queue: SerialQueue,
}

impl HeartbeatStorage {
    /// Creates an uncached instance with explicit collaborators. Most
    /// callers want [`get_instance`](Self::get_instance) instead.
    pub fn new(
        id: impl Into<String>,
        storage: Arc<dyn PersistentStorage>,
        coder: Arc<dyn HeartbeatCoder>,
    ) -> Self {
        Self {
            id: id.into(),
            storage,
            coder,
            queue: SerialQueue::new(),
        }
    }

    /// Returns the shared instance for `id`, creating one bound to the
    /// default collaborators when no live instance exists.
    ///
    /// The process-wide registry holds weak references only; liveness is
    /// governed by caller-held `Arc`s, and an instance's registry entry is
    /// pruned when its last strong reference drops.
    pub fn get_instance(id: impl Into<String>) -> Arc<Self> {
        let id = id.into();
        let mut instances = instances_guard();
        if let Some(existing) = instances.get(&id).and_then(Weak::upgrade) {
            return existing;
        }

        let storage = Arc::new(FilePersistence::default_for_id(&id));
        let instance = Arc::new(Self::new(id.clone(), storage, Arc::new(JsonHeartbeatCoder)));
        instances.insert(id, Arc::downgrade(&instance));
        instance
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Schedules a read-transform-write cycle without blocking the caller.
    ///
    /// The transform receives the currently persisted log, or `None` when
    /// nothing is stored or loading failed, and returns the replacement
    /// (`None` clears the slot). Persistence failures in this fire-and-forget
    /// variant are dropped; the next successful write wins.
    pub fn read_and_write_async<F>(&self, transform: F)
    where
        F: FnOnce(Option<HeartbeatInfo>) -> Option<HeartbeatInfo> + Send + 'static,
    {
        let id = self.id.clone();
        let storage = Arc::clone(&self.storage);
        let coder = Arc::clone(&self.coder);
        self.queue.submit(Box::new(move || {
            let current = load(&id, &*storage, &*coder);
            let replacement = transform(current);
            if let Err(err) = store(&*storage, &*coder, replacement.as_ref()) {
                LOGGER.debug(format!("Dropping heartbeat update for '{id}': {err}"));
            }
        }));
    }

    /// Runs a read-transform-write cycle on the serial queue and waits for
    /// it to complete, returning the value read before the transform ran.
    ///
    /// Load failures degrade to `None` exactly as in the asynchronous
    /// variant. Encode and write failures are surfaced, and the persisted
    /// bytes are left at their pre-call state.
    pub fn get_and_set<F>(&self, transform: F) -> HeartbeatResult<Option<HeartbeatInfo>>
    where
        F: FnOnce(Option<HeartbeatInfo>) -> Option<HeartbeatInfo> + Send + 'static,
    {
        let id = self.id.clone();
        let storage = Arc::clone(&self.storage);
        let coder = Arc::clone(&self.coder);
        let (done, wait) = mpsc::channel();
        self.queue.submit(Box::new(move || {
            let current = load(&id, &*storage, &*coder);
            let replacement = transform(current.clone());
            let outcome = store(&*storage, &*coder, replacement.as_ref()).map(|()| current);
            let _ = done.send(outcome);
        }));

        wait.recv().unwrap_or_else(|_| {
            Err(internal_error(
                "Heartbeat queue worker exited before completing the transform",
            ))
        })
    }
}

impl Drop for HeartbeatStorage {
    fn drop(&mut self) {
        // Prune this instance's registry entry. A newer live instance under
        // the same id keeps its entry.
        let mut instances = instances_guard();
        let stale = instances
            .get(&self.id)
            .is_some_and(|weak| weak.upgrade().is_none());
        if stale {
            instances.remove(&self.id);
        }
    }
}

fn load(
    id: &str,
    storage: &dyn PersistentStorage,
    coder: &dyn HeartbeatCoder,
) -> Option<HeartbeatInfo> {
    let data = storage.read().ok()?;
    match coder.decode(&data) {
        Ok(info) => Some(info),
        Err(err) => {
            LOGGER.debug(format!("Discarding stored heartbeat data for '{id}': {err}"));
            None
        }
    }
}

fn store(
    storage: &dyn PersistentStorage,
    coder: &dyn HeartbeatCoder,
    value: Option<&HeartbeatInfo>,
) -> HeartbeatResult<()> {
    match value {
        Some(info) => {
            let data = coder.encode(info)?;
            storage.write(Some(&data))
        }
        None => storage.write(None),
    }
}

#[cfg(test)]
pub(crate) fn cached_instance_exists(id: &str) -> bool {
    instances_guard().contains_key(id)
}

#[cfg(test)]
pub(crate) fn cached_instance_is_live(id: &str) -> bool {
    instances_guard().get(id).and_then(Weak::upgrade).is_some()
}
