//! Read-only listing of ephemeral jobs by namespace.
//!
//! The pod classifier needs "which jobs exist in this namespace" to decide
//! which of them a pod event concerns. The listing is eventually consistent
//! with the cluster's authoritative state; a failed listing drops the event
//! and the periodic resync backstop recovers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use ephjob_core::{EphemeralJobSnapshot, JobKey};

use crate::error::{Error, Result};

/// Read-only access to the known ephemeral jobs.
///
/// Calls must be bounded and non-blocking: the classifiers invoke them on
/// the shared event-dispatch pool.
pub trait JobLister: Send + Sync {
    /// Returns the current set of jobs in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be served. The pod classifier
    /// responds by dropping the event.
    fn list_namespace(&self, namespace: &str) -> Result<Vec<EphemeralJobSnapshot>>;
}

/// Converts a lock poison error to a lister error.
fn poison_err<T>(_: PoisonError<T>) -> Error {
    Error::lister("job store lock poisoned")
}

/// In-memory job store for tests and single-process embedding.
///
/// The store is keyed by [`JobKey`]; inserting a snapshot with the key of
/// an existing entry replaces it, mirroring how a watch cache converges on
/// the latest snapshot per object.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobKey, EphemeralJobSnapshot>>,
}

impl InMemoryJobStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a job snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert(&self, job: EphemeralJobSnapshot) -> Result<()> {
        let mut jobs = self.jobs.write().map_err(poison_err)?;
        jobs.insert(job.key(), job);
        drop(jobs);
        Ok(())
    }

    /// Removes the job with the given key, returning its last snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn remove(&self, key: &JobKey) -> Result<Option<EphemeralJobSnapshot>> {
        let mut jobs = self.jobs.write().map_err(poison_err)?;
        let removed = jobs.remove(key);
        drop(jobs);
        Ok(removed)
    }

    /// Returns the snapshot for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn get(&self, key: &JobKey) -> Result<Option<EphemeralJobSnapshot>> {
        let jobs = self.jobs.read().map_err(poison_err)?;
        Ok(jobs.get(key).cloned())
    }
}

impl JobLister for InMemoryJobStore {
    fn list_namespace(&self, namespace: &str) -> Result<Vec<EphemeralJobSnapshot>> {
        let jobs = self.jobs.read().map_err(poison_err)?;
        let mut listed: Vec<_> = jobs
            .values()
            .filter(|job| job.namespace == namespace)
            .cloned()
            .collect();
        drop(jobs);
        // Deterministic order for tests and stable trigger sequences.
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_filters_by_namespace() -> Result<()> {
        let store = InMemoryJobStore::new();
        store.insert(EphemeralJobSnapshot::new("debug", "a", "1"))?;
        store.insert(EphemeralJobSnapshot::new("debug", "b", "1"))?;
        store.insert(EphemeralJobSnapshot::new("prod", "c", "1"))?;

        let listed = store.list_namespace("debug")?;
        let names: Vec<_> = listed.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn insert_replaces_existing_snapshot() -> Result<()> {
        let store = InMemoryJobStore::new();
        let key = JobKey::new("debug", "inject");

        store.insert(EphemeralJobSnapshot::new("debug", "inject", "1"))?;
        store.insert(EphemeralJobSnapshot::new("debug", "inject", "2"))?;

        let job = store.get(&key)?.expect("job present");
        assert_eq!(job.resource_version.as_str(), "2");
        Ok(())
    }

    #[test]
    fn remove_returns_last_snapshot() -> Result<()> {
        let store = InMemoryJobStore::new();
        let key = JobKey::new("debug", "inject");

        store.insert(EphemeralJobSnapshot::new("debug", "inject", "1"))?;
        assert!(store.remove(&key)?.is_some());
        assert!(store.get(&key)?.is_none());
        Ok(())
    }
}
