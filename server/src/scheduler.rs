//! @ai:module:intent Per-document debounce timers: at most one pending validation per URI
//! @ai:module:layer infrastructure
//! @ai:module:public_api Scheduler
//! @ai:module:stateless false

use lsp_types::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

/// @ai:intent Arena of cancellable timers keyed by document URI
/// @ai:invariant a URI maps to at most one live timer; scheduling replaces, never queues
#[derive(Default)]
pub struct Scheduler {
    pending: Mutex<HashMap<Url, Pending>>,
    next_generation: AtomicU64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Cancel any timer for the URI and start a new one
    /// @ai:pre called inside a tokio runtime
    /// @ai:post on_fire receives the generation it was scheduled with; pass it to `claim`
    /// @ai:effects state:write, spawn
    pub fn schedule<F>(&self, uri: Url, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.lock();

        if let Some(previous) = pending.remove(&uri) {
            previous.handle.abort();
            debug!(%uri, "Replaced pending validation");
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        });

        debug!(%uri, delay_ms = delay.as_millis() as u64, "Scheduled validation");
        pending.insert(uri, Pending { generation, handle });
        generation
    }

    /// @ai:intent Called by a firing timer; succeeds only if that timer is still the current one
    /// @ai:post on success the URI is idle
    /// @ai:effects state:write
    pub fn claim(&self, uri: &Url, generation: u64) -> bool {
        let mut pending = self.lock();
        match pending.get(uri) {
            Some(current) if current.generation == generation => {
                pending.remove(uri);
                true
            }
            _ => false,
        }
    }

    /// @ai:intent Cancel the URI's pending timer; idempotent
    /// @ai:post returns whether a timer was pending
    /// @ai:effects state:write
    pub fn cancel(&self, uri: &Url) -> bool {
        match self.lock().remove(uri) {
            Some(previous) => {
                previous.handle.abort();
                debug!(%uri, "Cancelled pending validation");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, previous) in self.lock().drain() {
            previous.handle.abort();
        }
    }

    pub fn is_pending(&self, uri: &Url) -> bool {
        self.lock().contains_key(uri)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Url, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
