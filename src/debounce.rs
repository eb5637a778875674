//! Per-field debouncer
//!
//! Each edited field owns at most one pending write. Scheduling a new write
//! for the same field aborts the previous one, so only the last value
//! typed within the quiet window reaches the backend.

use board_dnd::EntityId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Text field whose remote write is debounced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    ProjectTitle(EntityId),
    ProjectDescription(EntityId),
    SectionTitle(EntityId),
    TaskTitle(EntityId),
    TaskContent(EntityId),
}

pub struct Debouncer {
    window: Duration,
    pending: Arc<Mutex<HashMap<FieldKey, JoinHandle<()>>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Runs `write` once the field has been quiet for the window,
    /// cancelling any write still pending for the same field
    pub fn schedule<F>(&self, key: FieldKey, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            write.await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = pending.insert(key, handle) {
            if !previous.is_finished() {
                trace!(?key, "superseded pending write");
            }
            previous.abort();
        }
    }

    /// Drops the pending write of a field, if any
    pub fn cancel(&self, key: FieldKey) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.remove(&key) {
            handle.abort();
        }
    }

    /// Drops every pending write matching `predicate`
    pub fn cancel_where(&self, predicate: impl Fn(&FieldKey) -> bool) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|key, handle| {
            if predicate(key) {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Number of writes still waiting or running
    pub fn pending(&self) -> usize {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.values().filter(|handle| !handle.is_finished()).count()
    }

    /// Waits for every pending write to fire and complete
    pub async fn flush(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            join_write(handle).await;
        }
    }
}

/// Awaits a spawned write, reporting a panic inside it
///
/// Aborted writes resolve to a cancellation error and are not reported.
pub(crate) async fn join_write(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        if e.is_panic() {
            warn!(error = %e, "pending write panicked");
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        for handle in pending.values() {
            handle.abort();
        }
    }
}
