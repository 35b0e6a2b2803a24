//! Observability metrics for the trigger layer.
//!
//! Exposed via the `metrics` crate facade; install a recorder (e.g. the
//! Prometheus exporter) in the embedding process to export them.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `ephjob_watch_triggers_total` | Counter | `kind` | Triggers enqueued per watched kind |
//! | `ephjob_watch_events_ignored_total` | Counter | `kind`, `reason` | Events classified as insignificant |
//! | `ephjob_watch_list_failures_total` | Counter | - | Dropped pod events due to listing failures |
//! | `ephjob_watch_trigger_queue_depth` | Gauge | - | Keys pending in the trigger queue |

use metrics::{counter, gauge};

/// Metric names as constants for consistency.
pub mod names {
    /// Counter: Triggers enqueued per watched kind.
    pub const TRIGGERS_TOTAL: &str = "ephjob_watch_triggers_total";
    /// Counter: Events classified as insignificant, by reason.
    pub const EVENTS_IGNORED_TOTAL: &str = "ephjob_watch_events_ignored_total";
    /// Counter: Pod events dropped because the namespace listing failed.
    pub const LIST_FAILURES_TOTAL: &str = "ephjob_watch_list_failures_total";
    /// Gauge: Keys pending in the trigger queue.
    pub const TRIGGER_QUEUE_DEPTH: &str = "ephjob_watch_trigger_queue_depth";
}

/// Label keys used across metrics.
pub mod labels {
    /// Watched resource kind (pod, job).
    pub const KIND: &str = "kind";
    /// Why an event produced no trigger.
    pub const REASON: &str = "reason";
}

/// Ignore reasons recorded on `ephjob_watch_events_ignored_total`.
pub mod reasons {
    /// Old and new snapshots carry the same resource version.
    pub const DUPLICATE_DELIVERY: &str = "duplicate_delivery";
    /// The ephemeral-container status lists are unchanged.
    pub const STATUSES_UNCHANGED: &str = "statuses_unchanged";
    /// None of the tracked spec fields changed.
    pub const SPEC_UNCHANGED: &str = "spec_unchanged";
    /// The job already carries deletion intent.
    pub const TERMINATING: &str = "terminating";
    /// The payload was not of the expected kind.
    pub const KIND_MISMATCH: &str = "kind_mismatch";
    /// A collaborator call failed and the event was dropped.
    pub const COLLABORATOR_FAILURE: &str = "collaborator_failure";
}

/// High-level interface for recording trigger-layer metrics.
///
/// Cheap to clone and share across handlers. Every method is safe to call
/// without a recorder installed.
#[derive(Debug, Clone, Default)]
pub struct WatchMetrics {
    _private: (),
}

impl WatchMetrics {
    /// Creates a new metrics recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a trigger enqueued for a job, attributed to the event kind.
    pub fn record_trigger(&self, kind: &str) {
        counter!(
            names::TRIGGERS_TOTAL,
            labels::KIND => kind.to_string(),
        )
        .increment(1);
    }

    /// Records an event that produced no trigger.
    pub fn record_ignored(&self, kind: &str, reason: &str) {
        counter!(
            names::EVENTS_IGNORED_TOTAL,
            labels::KIND => kind.to_string(),
            labels::REASON => reason.to_string(),
        )
        .increment(1);
    }

    /// Records a pod event dropped because the namespace listing failed.
    pub fn record_list_failure(&self) {
        counter!(names::LIST_FAILURES_TOTAL).increment(1);
    }

    /// Sets the trigger-queue depth.
    #[allow(clippy::cast_precision_loss)] // Gauge values are typically small
    pub fn set_queue_depth(&self, depth: usize) {
        gauge!(names::TRIGGER_QUEUE_DEPTH).set(depth as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_metrics_can_record_without_recorder() {
        let metrics = WatchMetrics::new();

        // These calls should not panic even without a metrics recorder installed
        metrics.record_trigger("pod");
        metrics.record_ignored("pod", reasons::DUPLICATE_DELIVERY);
        metrics.record_list_failure();
        metrics.set_queue_depth(3);
    }
}
