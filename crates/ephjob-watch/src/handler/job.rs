//! Job event classification.

use std::sync::Arc;

use tracing::{debug, warn};

use ephjob_core::EphemeralJobSnapshot;

use crate::event::{EventHandler, WatchEvent};
use crate::expectations::ExpectationTracker;
use crate::metrics::{WatchMetrics, reasons};
use crate::trigger::TriggerSink;

const KIND: &str = "job";

/// Translates job lifecycle events into triggers and expectation cleanup.
///
/// - **Create**: triggered unconditionally, unless the snapshot already
///   carries deletion intent (a relist can deliver a create after the
///   delete).
/// - **Update**: ignored when the resource versions are equal. A snapshot
///   with deletion intent triggers exactly once and skips all field
///   comparison; otherwise only a change in one of the four tracked spec
///   fields (TTL after finished, paused, parallelism, replicas) triggers.
///   Everything else — including status writes by the reconciler itself —
///   is ignored to avoid a feedback loop.
/// - **Delete**: no trigger; all expectation bookkeeping for the key is
///   removed so nothing leaks for a job that will never reconcile again.
pub struct JobEventHandler {
    expectations: Arc<dyn ExpectationTracker>,
    sink: Arc<dyn TriggerSink>,
    metrics: WatchMetrics,
}

impl JobEventHandler {
    /// Creates a job classifier over the given collaborators.
    #[must_use]
    pub fn new(expectations: Arc<dyn ExpectationTracker>, sink: Arc<dyn TriggerSink>) -> Self {
        Self {
            expectations,
            sink,
            metrics: WatchMetrics::new(),
        }
    }

    fn trigger(&self, job: &EphemeralJobSnapshot) {
        let key = job.key();
        match self.sink.trigger(key.clone()) {
            Ok(_) => self.metrics.record_trigger(KIND),
            Err(err) => {
                warn!(job = %key, error = %err, "failed to enqueue trigger");
                self.metrics.record_ignored(KIND, reasons::COLLABORATOR_FAILURE);
            }
        }
    }
}

impl EventHandler for JobEventHandler {
    fn handle(&self, event: &WatchEvent) {
        match event {
            WatchEvent::Created(object) => {
                let job = match object.as_job() {
                    Ok(job) => job,
                    Err(_) => {
                        self.metrics.record_ignored(KIND, reasons::KIND_MISMATCH);
                        return;
                    }
                };

                if job.is_terminating() {
                    self.metrics.record_ignored(KIND, reasons::TERMINATING);
                    return;
                }

                self.trigger(job);
            }
            WatchEvent::Updated { old, new } => {
                let (old_job, new_job) = match (old.as_job(), new.as_job()) {
                    (Ok(old_job), Ok(new_job)) => (old_job, new_job),
                    _ => {
                        self.metrics.record_ignored(KIND, reasons::KIND_MISMATCH);
                        return;
                    }
                };

                if new_job.resource_version == old_job.resource_version {
                    self.metrics.record_ignored(KIND, reasons::DUPLICATE_DELIVERY);
                    return;
                }

                // Deletion intent first: a terminating job's remaining spec
                // fields are irrelevant.
                if new_job.is_terminating() {
                    debug!(job = %new_job.key(), "observed terminating job");
                    self.trigger(new_job);
                    return;
                }

                if scheduling_fields_changed(old_job, new_job) {
                    debug!(job = %new_job.key(), "observed spec change");
                    self.trigger(new_job);
                } else {
                    self.metrics.record_ignored(KIND, reasons::SPEC_UNCHANGED);
                }
            }
            WatchEvent::Deleted(object) => {
                let job = match object.as_job() {
                    Ok(job) => job,
                    Err(_) => {
                        self.metrics.record_ignored(KIND, reasons::KIND_MISMATCH);
                        return;
                    }
                };

                let key = job.key();
                if let Err(err) = self.expectations.delete_all(&key) {
                    warn!(job = %key, error = %err, "failed to clear expectations");
                }
            }
        }
    }
}

/// Compares the four spec fields that affect scheduling behavior.
fn scheduling_fields_changed(old: &EphemeralJobSnapshot, new: &EphemeralJobSnapshot) -> bool {
    old.spec.ttl_seconds_after_finished != new.spec.ttl_seconds_after_finished
        || old.spec.paused != new.spec.paused
        || old.spec.parallelism != new.spec.parallelism
        || old.spec.replicas != new.spec.replicas
}
