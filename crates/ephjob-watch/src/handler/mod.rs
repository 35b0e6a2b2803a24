//! Event classifiers for the watched resource kinds.
//!
//! One handler per watched kind: [`PodEventHandler`] translates pod
//! lifecycle events into job triggers and expectation updates,
//! [`JobEventHandler`] translates job lifecycle events into triggers and
//! expectation cleanup. Both implement [`crate::event::EventHandler`], the
//! seam the external event-dispatch mechanism registers against.
//!
//! Handlers never propagate errors: they sit on the hot path of the watch
//! delivery pipeline, so every failure degrades to "this event produces no
//! trigger" and the periodic resync backstop recovers.

mod job;
mod pod;

pub use job::JobEventHandler;
pub use pod::PodEventHandler;

use std::sync::Arc;

use crate::expectations::ExpectationTracker;
use crate::lister::JobLister;
use crate::matcher::JobMatcher;
use crate::trigger::TriggerSink;

/// The classifier pair for one controller, built over shared collaborators.
///
/// Registration glue: the embedding process constructs this once and
/// registers `pods` with the pod watch and `jobs` with the job watch.
#[derive(Clone)]
pub struct TriggerHandlers {
    /// Classifier for pod events.
    pub pods: Arc<PodEventHandler>,
    /// Classifier for job events.
    pub jobs: Arc<JobEventHandler>,
}

impl TriggerHandlers {
    /// Builds both classifiers over the given collaborators.
    #[must_use]
    pub fn new(
        lister: Arc<dyn JobLister>,
        matcher: Arc<dyn JobMatcher>,
        expectations: Arc<dyn ExpectationTracker>,
        sink: Arc<dyn TriggerSink>,
    ) -> Self {
        Self {
            pods: Arc::new(PodEventHandler::new(
                lister,
                matcher,
                Arc::clone(&expectations),
                Arc::clone(&sink),
            )),
            jobs: Arc::new(JobEventHandler::new(expectations, sink)),
        }
    }
}
