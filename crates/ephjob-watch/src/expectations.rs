//! Expectation tracking for controller-caused mutations.
//!
//! When the reconciler injects an ephemeral container it records an
//! expectation: "container X should appear on a pod of job K". When the
//! corresponding watch event is observed, the classifier marks the
//! expectation satisfied, which keeps the controller from mistaking its own
//! mutation for external drift and re-reconciling prematurely.
//!
//! The classifiers consume only the [`ExpectationTracker`] contract;
//! [`InMemoryExpectations`] additionally carries the producer-side surface
//! the reconciler uses (`expect`, `pending`, `satisfied`).

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use ephjob_core::JobKey;

use crate::error::{Error, Result};

/// Per-job ledger of anticipated primitive-resource mutations.
///
/// ## Contract
///
/// - `observe` marks one anticipated mutation satisfied and is safe to call
///   when no such expectation exists (no-op).
/// - `delete_all` removes all bookkeeping for a job and is safe to call on
///   a job with no tracked expectations.
/// - Implementations are internally synchronized with at-least linearizable
///   per-key semantics; classifiers call them concurrently.
pub trait ExpectationTracker: Send + Sync {
    /// Marks the expectation `(key, container)` satisfied, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker state is inaccessible. Classifiers
    /// swallow such errors; they are surfaced for tests and embedding code.
    fn observe(&self, key: &JobKey, container: &str) -> Result<()>;

    /// Removes every expectation recorded for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker state is inaccessible.
    fn delete_all(&self, key: &JobKey) -> Result<()>;
}

/// Converts a lock poison error to a tracker error.
fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::expectations("expectation tracker lock poisoned")
}

/// In-memory expectation ledger.
///
/// Keys with no outstanding expectations are dropped from the map, so
/// `satisfied` is true both for jobs that were never expected anything and
/// for jobs whose expectations have all been observed.
#[derive(Debug, Default)]
pub struct InMemoryExpectations {
    entries: RwLock<HashMap<JobKey, BTreeSet<String>>>,
}

impl InMemoryExpectations {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the reconciler anticipates `container` appearing for
    /// `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn expect(&self, key: &JobKey, container: impl Into<String>) -> Result<()> {
        let mut entries = self.entries.write().map_err(poison_err)?;
        entries
            .entry(key.clone())
            .or_default()
            .insert(container.into());
        drop(entries);
        Ok(())
    }

    /// Returns the outstanding container names for `key` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn pending(&self, key: &JobKey) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(poison_err)?;
        Ok(entries
            .get(key)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Returns true if `key` has no outstanding expectations.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn satisfied(&self, key: &JobKey) -> Result<bool> {
        let entries = self.entries.read().map_err(poison_err)?;
        Ok(!entries.contains_key(key))
    }
}

impl ExpectationTracker for InMemoryExpectations {
    fn observe(&self, key: &JobKey, container: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poison_err)?;
        if let Some(names) = entries.get_mut(key) {
            names.remove(container);
            if names.is_empty() {
                entries.remove(key);
            }
        }
        drop(entries);
        Ok(())
    }

    fn delete_all(&self, key: &JobKey) -> Result<()> {
        let mut entries = self.entries.write().map_err(poison_err)?;
        entries.remove(key);
        drop(entries);
        Ok(())
    }
}
