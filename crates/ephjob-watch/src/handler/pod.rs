//! Pod event classification.

use std::sync::Arc;

use tracing::{debug, warn};

use ephjob_core::PodSnapshot;

use crate::event::{EventHandler, WatchEvent};
use crate::expectations::ExpectationTracker;
use crate::lister::JobLister;
use crate::matcher::JobMatcher;
use crate::metrics::{WatchMetrics, reasons};
use crate::trigger::TriggerSink;

const KIND: &str = "pod";

/// Translates pod lifecycle events into job triggers and expectation
/// updates.
///
/// - **Create**: every selector-matching job in the pod's namespace is
///   triggered.
/// - **Update**: ignored when the resource versions are equal (duplicate
///   delivery) or when the ephemeral-container status lists are unchanged
///   (the significance filter); otherwise handled like a create using the
///   new snapshot.
/// - **Delete**: handled like a create using the last-known snapshot, since
///   losing the pod's containers is itself relevant to job state.
///
/// For every matched job, each container name the matcher attributes to
/// that job is observed against the expectation tracker before the trigger
/// is enqueued, so a mutation the reconciler issued itself is not mistaken
/// for external drift.
pub struct PodEventHandler {
    lister: Arc<dyn JobLister>,
    matcher: Arc<dyn JobMatcher>,
    expectations: Arc<dyn ExpectationTracker>,
    sink: Arc<dyn TriggerSink>,
    metrics: WatchMetrics,
}

impl PodEventHandler {
    /// Creates a pod classifier over the given collaborators.
    #[must_use]
    pub fn new(
        lister: Arc<dyn JobLister>,
        matcher: Arc<dyn JobMatcher>,
        expectations: Arc<dyn ExpectationTracker>,
        sink: Arc<dyn TriggerSink>,
    ) -> Self {
        Self {
            lister,
            matcher,
            expectations,
            sink,
            metrics: WatchMetrics::new(),
        }
    }

    /// Fans one pod snapshot out to every matching job in its namespace.
    fn trigger_matching_jobs(&self, pod: &PodSnapshot) {
        let jobs = match self.lister.list_namespace(&pod.namespace) {
            Ok(jobs) => jobs,
            Err(err) => {
                // Dropped on purpose: the resync backstop recovers, and a
                // retry here would stall the shared dispatch pool.
                debug!(
                    namespace = %pod.namespace,
                    pod = %pod.name,
                    error = %err,
                    "dropping pod event, namespace listing failed"
                );
                self.metrics.record_list_failure();
                return;
            }
        };

        for job in &jobs {
            let outcome = self.matcher.match_pod(pod, job);
            if !outcome.matched {
                continue;
            }

            let key = job.key();
            for container in &outcome.containers {
                if let Err(err) = self.expectations.observe(&key, container) {
                    warn!(job = %key, container = %container, error = %err,
                        "failed to observe expectation");
                }
            }

            match self.sink.trigger(key.clone()) {
                Ok(_) => self.metrics.record_trigger(KIND),
                Err(err) => {
                    warn!(job = %key, error = %err, "failed to enqueue trigger");
                    self.metrics.record_ignored(KIND, reasons::COLLABORATOR_FAILURE);
                }
            }
        }
    }
}

impl EventHandler for PodEventHandler {
    fn handle(&self, event: &WatchEvent) {
        match event {
            WatchEvent::Created(object) | WatchEvent::Deleted(object) => {
                let pod = match object.as_pod() {
                    Ok(pod) => pod,
                    Err(_) => {
                        self.metrics.record_ignored(KIND, reasons::KIND_MISMATCH);
                        return;
                    }
                };
                self.trigger_matching_jobs(pod);
            }
            WatchEvent::Updated { old, new } => {
                let (old_pod, new_pod) = match (old.as_pod(), new.as_pod()) {
                    (Ok(old_pod), Ok(new_pod)) => (old_pod, new_pod),
                    _ => {
                        self.metrics.record_ignored(KIND, reasons::KIND_MISMATCH);
                        return;
                    }
                };

                if new_pod.resource_version == old_pod.resource_version {
                    self.metrics.record_ignored(KIND, reasons::DUPLICATE_DELIVERY);
                    return;
                }

                // Significance filter: only ephemeral-container status churn
                // matters to this controller. Ordered comparison, differing
                // lengths are unequal.
                if new_pod.ephemeral_container_statuses == old_pod.ephemeral_container_statuses {
                    self.metrics.record_ignored(KIND, reasons::STATUSES_UNCHANGED);
                    return;
                }

                self.trigger_matching_jobs(new_pod);
            }
        }
    }
}
