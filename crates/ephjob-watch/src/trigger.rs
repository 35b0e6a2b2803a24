//! Trigger sink abstraction and the in-memory coalescing queue.
//!
//! This module provides:
//!
//! - [`TriggerSink`]: the contract the classifiers hand work through
//! - [`TriggerOutcome`]: whether a key was enqueued or coalesced
//! - [`TriggerQueue`]: in-memory ordered, deduplicating queue
//!
//! ## Design Principles
//!
//! - **Idempotent enqueue**: triggering a key already pending is a no-op
//! - **Coalescing**: many triggers for one key collapse into one unit of work
//! - **Release on take**: once a key is handed to the reconciler, a new
//!   trigger for it enqueues again

use std::collections::{HashSet, VecDeque};
use std::sync::{PoisonError, RwLock};

use ephjob_core::JobKey;

use crate::error::{Error, Result};

/// Result of handing a key to a trigger sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The key was newly enqueued.
    Enqueued,
    /// The key was already pending and the trigger was absorbed.
    Coalesced,
}

impl TriggerOutcome {
    /// Returns true if the key was newly enqueued.
    #[must_use]
    pub const fn is_enqueued(&self) -> bool {
        matches!(self, Self::Enqueued)
    }
}

/// The sole path by which the trigger layer hands work to the reconciler.
///
/// ## Contract
///
/// - `trigger` is idempotent and commutative per key: duplicate keys pending
///   at the same time collapse, and reordering triggers for different keys
///   is harmless.
/// - Implementations are internally synchronized; classifiers call them
///   concurrently from the event-dispatch pool and hold no locks of their
///   own.
/// - Calls must complete quickly without blocking: a slow sink stalls the
///   shared dispatch pool.
pub trait TriggerSink: Send + Sync {
    /// Enqueues a job for reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the key. Classifiers
    /// swallow such errors (the resync backstop recovers); they are surfaced
    /// here for tests and embedding code.
    fn trigger(&self, key: JobKey) -> Result<TriggerOutcome>;
}

/// Internal queue state protected by a single lock.
#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<JobKey>,
    pending: HashSet<JobKey>,
}

/// Converts a lock poison error to a queue error.
fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::queue("trigger queue lock poisoned")
}

/// In-memory ordered, deduplicating trigger queue.
///
/// Keys are delivered in first-trigger order. A key stays deduplicated
/// while pending and is released when taken, matching the coalescing
/// work-queue semantics the reconciler expects.
///
/// ## Example
///
/// ```rust
/// use ephjob_core::JobKey;
/// use ephjob_watch::trigger::{TriggerQueue, TriggerSink};
///
/// let queue = TriggerQueue::new();
/// queue.trigger(JobKey::new("debug", "inject"))?;
/// queue.trigger(JobKey::new("debug", "inject"))?; // coalesced
/// assert_eq!(queue.depth()?, 1);
/// # Ok::<(), ephjob_watch::error::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct TriggerQueue {
    state: RwLock<QueueState>,
}

impl TriggerQueue {
    /// Creates a new empty trigger queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next key from the queue, releasing its deduplication slot.
    ///
    /// Returns `None` if the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn take(&self) -> Result<Option<JobKey>> {
        let mut state = self.state.write().map_err(poison_err)?;
        let key = state.queue.pop_front();
        if let Some(ref key) = key {
            state.pending.remove(key);
        }
        drop(state);
        Ok(key)
    }

    /// Peeks at the next key without removing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn peek(&self) -> Result<Option<JobKey>> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.queue.front().cloned())
    }

    /// Returns all pending keys in trigger order, emptying the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn drain(&self) -> Result<Vec<JobKey>> {
        let mut state = self.state.write().map_err(poison_err)?;
        let drained: Vec<_> = state.queue.drain(..).collect();
        state.pending.clear();
        drop(state);
        Ok(drained)
    }

    /// Returns the number of keys currently pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn depth(&self) -> Result<usize> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.queue.len())
    }

    /// Clears the queue and its deduplication state.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.write().map_err(poison_err)?;
        state.queue.clear();
        state.pending.clear();
        drop(state);
        Ok(())
    }
}

impl TriggerSink for TriggerQueue {
    fn trigger(&self, key: JobKey) -> Result<TriggerOutcome> {
        let mut state = self.state.write().map_err(poison_err)?;

        if state.pending.contains(&key) {
            return Ok(TriggerOutcome::Coalesced);
        }

        state.pending.insert(key.clone());
        state.queue.push_back(key);
        drop(state);

        Ok(TriggerOutcome::Enqueued)
    }
}
