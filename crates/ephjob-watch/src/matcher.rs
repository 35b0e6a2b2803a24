//! Matching pods to the jobs that target them.
//!
//! The matcher is a pure function: given a pod snapshot and a job snapshot
//! it decides whether the job's selector covers the pod, and which of the
//! job's ephemeral containers the pod already carries. The classifiers
//! treat it as policy supplied at construction; [`SelectorMatcher`] is the
//! stock policy.

use ephjob_core::{EphemeralJobSnapshot, PodSnapshot};

/// Outcome of matching one pod against one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Whether the job's selector covers the pod.
    pub matched: bool,
    /// Names of the job's template containers present on the pod.
    ///
    /// Each name is an anticipated mutation the watch has now observed;
    /// the pod classifier feeds them to the expectation tracker.
    pub containers: Vec<String>,
}

impl MatchOutcome {
    /// A non-matching outcome.
    #[must_use]
    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// Policy deciding which pods belong to which jobs.
///
/// Implementations must be pure and fast: the classifiers call this once
/// per (pod, job) pair on the shared event-dispatch pool.
pub trait JobMatcher: Send + Sync {
    /// Matches `pod` against `job`.
    fn match_pod(&self, pod: &PodSnapshot, job: &EphemeralJobSnapshot) -> MatchOutcome;
}

/// Stock matching policy: label selector plus template-container presence.
///
/// A job matches a pod when both live in the same namespace and the job's
/// selector matches the pod's labels (an empty selector selects every pod
/// in the namespace). The containers of interest are the job's template
/// container names that already appear in the pod's ephemeral-container
/// status list — the observed form of an injection the reconciler issued.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Creates the stock matcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl JobMatcher for SelectorMatcher {
    fn match_pod(&self, pod: &PodSnapshot, job: &EphemeralJobSnapshot) -> MatchOutcome {
        if pod.namespace != job.namespace || !job.spec.selector.matches(&pod.labels) {
            return MatchOutcome::unmatched();
        }

        let containers = job
            .spec
            .template_containers
            .iter()
            .filter(|name| {
                pod.ephemeral_container_statuses
                    .iter()
                    .any(|status| status.name == **name)
            })
            .cloned()
            .collect();

        MatchOutcome {
            matched: true,
            containers,
        }
    }
}
