//! Namespaced identity for ephemeral jobs.
//!
//! `JobKey` is the unit of work handed to the reconciler: the trigger queue
//! deduplicates on it, and the expectation tracker is keyed by it. The
//! canonical string form `{namespace}/{name}` is stable and round-trips
//! through `FromStr`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The namespace + name identity of an ephemeral job.
///
/// Immutable once constructed. Ordering is namespace-first, then name,
/// which keeps keys for one namespace adjacent when sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobKey {
    /// Namespace the job lives in.
    pub namespace: String,
    /// Name of the job within its namespace.
    pub name: String,
}

impl JobKey {
    /// Creates a new job key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for JobKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self::new(namespace, name))
            }
            _ => Err(Error::invalid_key(format!(
                "expected '{{namespace}}/{{name}}', got '{s}'"
            ))),
        }
    }
}
