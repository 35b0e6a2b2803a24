//! Watch-event model for the trigger layer.
//!
//! The watch mechanism delivers three event kinds per watched resource:
//! create, update (carrying both the old and the new snapshot), and delete.
//! Payloads arrive as a tagged union over the watched kinds; classifiers
//! extract the kind they care about with [`Object::as_pod`] /
//! [`Object::as_job`], which yield a classified [`Error::KindMismatch`]
//! instead of panicking when the dispatch mechanism misroutes an event.

use serde::{Deserialize, Serialize};

use ephjob_core::{EphemeralJobSnapshot, PodSnapshot};

use crate::error::{Error, Result};

/// A snapshot of one of the watched resource kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Object {
    /// A workload pod.
    Pod(PodSnapshot),
    /// An ephemeral job.
    Job(EphemeralJobSnapshot),
}

impl Object {
    /// Returns the kind name of the payload.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Pod(_) => "pod",
            Self::Job(_) => "job",
        }
    }

    /// Extracts the pod snapshot, or reports what arrived instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] if the payload is not a pod.
    pub fn as_pod(&self) -> Result<&PodSnapshot> {
        match self {
            Self::Pod(pod) => Ok(pod),
            Self::Job(_) => Err(Error::KindMismatch {
                expected: "pod",
                actual: self.kind(),
            }),
        }
    }

    /// Extracts the job snapshot, or reports what arrived instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] if the payload is not a job.
    pub fn as_job(&self) -> Result<&EphemeralJobSnapshot> {
        match self {
            Self::Job(job) => Ok(job),
            Self::Pod(_) => Err(Error::KindMismatch {
                expected: "job",
                actual: self.kind(),
            }),
        }
    }
}

impl From<PodSnapshot> for Object {
    fn from(pod: PodSnapshot) -> Self {
        Self::Pod(pod)
    }
}

impl From<EphemeralJobSnapshot> for Object {
    fn from(job: EphemeralJobSnapshot) -> Self {
        Self::Job(job)
    }
}

/// A single delivered watch event.
///
/// Update events carry both snapshots so classifiers can compare resource
/// versions and status lists; create and delete carry the only snapshot the
/// watch has (for delete, the last-known state of the object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum WatchEvent {
    /// The object was observed for the first time.
    Created(Object),
    /// The object changed; both snapshots are delivered.
    Updated {
        /// Snapshot before the change.
        old: Object,
        /// Snapshot after the change.
        new: Object,
    },
    /// The object is gone; the payload is its last-known snapshot.
    Deleted(Object),
}

/// A classifier for delivered watch events.
///
/// This is the registration seam between the external multi-worker event
/// dispatch mechanism and the trigger layer. Implementations are invoked
/// concurrently, must not block, and must not fail: every internal error
/// degrades to "no trigger" (see the crate docs on the resync backstop).
pub trait EventHandler: Send + Sync {
    /// Classifies one event, producing zero or more queued triggers as a
    /// side effect.
    fn handle(&self, event: &WatchEvent);
}
