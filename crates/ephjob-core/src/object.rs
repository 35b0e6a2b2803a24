//! Read-only snapshots of the watched cluster resources.
//!
//! Snapshots are what the watch mechanism delivers to the trigger layer.
//! They are never mutated here: the trigger layer owns only its transient
//! classification decision.
//!
//! Every snapshot carries a [`ResourceVersion`], an opaque token that
//! advances on every write to the underlying object. Two snapshots with an
//! equal resource version are guaranteed identical, which is the basis of
//! the duplicate-delivery guard in the classifiers.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::JobKey;
use crate::selector::LabelSelector;

/// Opaque version token attached to every snapshot of a watched object.
///
/// Compared only for equality. The token is monotonically advancing on the
/// server side, but no ordering semantics are exposed here: a classifier
/// may only conclude "identical" or "different".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVersion(String);

impl ResourceVersion {
    /// Creates a resource version from its opaque string form.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Returns the opaque string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse lifecycle phase of an ephemeral container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerPhase {
    /// Requested but not yet started.
    Waiting,
    /// Currently executing.
    Running,
    /// Exited (successfully or not).
    Terminated,
}

/// Status entry for one ephemeral container on a pod.
///
/// List equality over these entries is the significance filter for pod
/// updates: order and length both matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralContainerStatus {
    /// Container name, unique within the pod.
    pub name: String,
    /// Lifecycle phase.
    pub phase: ContainerPhase,
    /// Whether the container reported ready.
    pub ready: bool,
    /// Number of restarts observed.
    pub restart_count: i32,
}

impl EphemeralContainerStatus {
    /// Creates a status entry in the given phase.
    #[must_use]
    pub fn new(name: impl Into<String>, phase: ContainerPhase) -> Self {
        Self {
            name: name.into(),
            phase,
            ready: false,
            restart_count: 0,
        }
    }

    /// Marks the container ready.
    #[must_use]
    pub const fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    /// Sets the observed restart count.
    #[must_use]
    pub const fn with_restart_count(mut self, restart_count: i32) -> Self {
        self.restart_count = restart_count;
        self
    }
}

/// Snapshot of a workload pod as delivered by the watch mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSnapshot {
    /// Namespace the pod lives in.
    pub namespace: String,
    /// Pod name.
    pub name: String,
    /// Opaque version token for this snapshot.
    pub resource_version: ResourceVersion,
    /// Pod labels, matched against job selectors.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Ordered status list of ephemeral containers on the pod.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ephemeral_container_statuses: Vec<EphemeralContainerStatus>,
}

impl PodSnapshot {
    /// Creates a pod snapshot with no labels or container statuses.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        resource_version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            resource_version: ResourceVersion::new(resource_version),
            labels: BTreeMap::new(),
            ephemeral_container_statuses: Vec::new(),
        }
    }

    /// Adds a label to the pod.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Appends an ephemeral-container status entry.
    #[must_use]
    pub fn with_container_status(mut self, status: EphemeralContainerStatus) -> Self {
        self.ephemeral_container_statuses.push(status);
        self
    }

    /// Replaces the resource version, leaving everything else intact.
    ///
    /// Useful for building the old/new pair of an update event.
    #[must_use]
    pub fn with_resource_version(mut self, resource_version: impl Into<String>) -> Self {
        self.resource_version = ResourceVersion::new(resource_version);
        self
    }
}

/// Mutable spec fields of an ephemeral job that affect scheduling.
///
/// Only the four fields below participate in the job-update significance
/// check; everything else on the job is invisible to the trigger layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralJobSpec {
    /// Seconds to keep the job after it finishes, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_finished: Option<i32>,
    /// Whether reconciliation of this job is paused.
    #[serde(default)]
    pub paused: bool,
    /// Maximum number of pods injected concurrently, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<i32>,
    /// Desired number of pods to inject into, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// Selector deciding which pods this job targets.
    #[serde(default)]
    pub selector: LabelSelector,
    /// Names of the ephemeral containers the job injects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_containers: Vec<String>,
}

impl EphemeralJobSpec {
    /// Creates a spec targeting pods matched by `selector`.
    #[must_use]
    pub fn new(selector: LabelSelector) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    /// Sets the time-to-live after the job finishes.
    #[must_use]
    pub const fn with_ttl_seconds_after_finished(mut self, seconds: i32) -> Self {
        self.ttl_seconds_after_finished = Some(seconds);
        self
    }

    /// Sets the paused flag.
    #[must_use]
    pub const fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Bounds the number of concurrent injections.
    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: i32) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Sets the desired replica count.
    #[must_use]
    pub const fn with_replicas(mut self, replicas: i32) -> Self {
        self.replicas = Some(replicas);
        self
    }

    /// Adds an ephemeral container name to the template.
    #[must_use]
    pub fn with_template_container(mut self, name: impl Into<String>) -> Self {
        self.template_containers.push(name.into());
        self
    }
}

/// Snapshot of an ephemeral job as delivered by the watch mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EphemeralJobSnapshot {
    /// Namespace the job lives in.
    pub namespace: String,
    /// Job name.
    pub name: String,
    /// Opaque version token for this snapshot.
    pub resource_version: ResourceVersion,
    /// Set when deletion of the job has been requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
    /// Mutable scheduling spec.
    #[serde(default)]
    pub spec: EphemeralJobSpec,
}

impl EphemeralJobSnapshot {
    /// Creates a job snapshot with a default (empty) spec.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        resource_version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            resource_version: ResourceVersion::new(resource_version),
            deletion_timestamp: None,
            spec: EphemeralJobSpec::default(),
        }
    }

    /// Replaces the job spec.
    #[must_use]
    pub fn with_spec(mut self, spec: EphemeralJobSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Marks the job as being deleted at `timestamp`.
    #[must_use]
    pub const fn with_deletion_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.deletion_timestamp = Some(timestamp);
        self
    }

    /// Replaces the resource version, leaving everything else intact.
    #[must_use]
    pub fn with_resource_version(mut self, resource_version: impl Into<String>) -> Self {
        self.resource_version = ResourceVersion::new(resource_version);
        self
    }

    /// Returns the job's key.
    #[must_use]
    pub fn key(&self) -> JobKey {
        JobKey::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns true if deletion of the job has been requested.
    #[must_use]
    pub const fn is_terminating(&self) -> bool {
        self.deletion_timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_resource_versions_compare_equal() {
        let a = ResourceVersion::new("5");
        let b = ResourceVersion::new("5");
        assert_eq!(a, b);
        assert_ne!(a, ResourceVersion::new("6"));
    }

    #[test]
    fn job_key_is_namespace_and_name() {
        let job = EphemeralJobSnapshot::new("debug", "inject-profiler", "1");
        assert_eq!(job.key(), JobKey::new("debug", "inject-profiler"));
    }

    #[test]
    fn job_terminating_tracks_deletion_timestamp() {
        let job = EphemeralJobSnapshot::new("debug", "inject-profiler", "1");
        assert!(!job.is_terminating());
        assert!(job.with_deletion_timestamp(Utc::now()).is_terminating());
    }

    #[test]
    fn container_status_list_equality_is_order_sensitive() {
        let a = vec![
            EphemeralContainerStatus::new("c1", ContainerPhase::Running),
            EphemeralContainerStatus::new("c2", ContainerPhase::Waiting),
        ];
        let b = vec![
            EphemeralContainerStatus::new("c2", ContainerPhase::Waiting),
            EphemeralContainerStatus::new("c1", ContainerPhase::Running),
        ];
        assert_ne!(a, b);
    }

    #[test]
    fn pod_snapshot_serializes() {
        let pod = PodSnapshot::new("debug", "web-0", "5")
            .with_label("app", "web")
            .with_container_status(
                EphemeralContainerStatus::new("probe", ContainerPhase::Running)
                    .with_ready(true)
                    .with_restart_count(1),
            );

        let json = serde_json::to_string(&pod).expect("serialize");
        let parsed: PodSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, pod);
    }
}
