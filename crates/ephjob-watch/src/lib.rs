//! # ephjob-watch
//!
//! Watch-event classification and trigger coalescing for the ephjob
//! controller.
//!
//! This crate decides, from the stream of low-level watch events delivered
//! by the cluster, which ephemeral jobs need re-evaluation by the
//! reconciliation loop — while suppressing the redundant or premature
//! triggers that the lag between issuing a mutation and observing it would
//! otherwise cause.
//!
//! ## Core Concepts
//!
//! - **Classifier**: per-kind event handler deciding whether an event is
//!   semantically significant and which jobs it concerns
//! - **Trigger**: a [`JobKey`](ephjob_core::JobKey) enqueued for the
//!   reconciler; the queue coalesces duplicate keys
//! - **Expectation**: bookkeeping for a mutation the controller caused
//!   itself, satisfied when the corresponding event is observed
//!
//! ## Guarantees
//!
//! - **Idempotent under duplicate delivery**: equal resource versions never
//!   trigger work
//! - **Coalescing**: any number of triggers for one pending key reduce to
//!   one unit of reconciler work
//! - **Non-blocking**: classifiers never block, suspend, or propagate
//!   errors; dropped events are recovered by the periodic resync backstop
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ephjob_core::{EphemeralJobSnapshot, EphemeralJobSpec, LabelSelector, PodSnapshot};
//! use ephjob_watch::event::{EventHandler, Object, WatchEvent};
//! use ephjob_watch::expectations::InMemoryExpectations;
//! use ephjob_watch::handler::TriggerHandlers;
//! use ephjob_watch::lister::InMemoryJobStore;
//! use ephjob_watch::matcher::SelectorMatcher;
//! use ephjob_watch::trigger::TriggerQueue;
//!
//! # fn main() -> ephjob_watch::error::Result<()> {
//! let store = Arc::new(InMemoryJobStore::new());
//! store.insert(
//!     EphemeralJobSnapshot::new("debug", "inject-probe", "1").with_spec(
//!         EphemeralJobSpec::new(LabelSelector::new().with_label("app", "web")),
//!     ),
//! )?;
//!
//! let queue = Arc::new(TriggerQueue::new());
//! let handlers = TriggerHandlers::new(
//!     store,
//!     Arc::new(SelectorMatcher::new()),
//!     Arc::new(InMemoryExpectations::new()),
//!     Arc::clone(&queue),
//! );
//!
//! let pod = PodSnapshot::new("debug", "web-0", "5").with_label("app", "web");
//! handlers.pods.handle(&WatchEvent::Created(Object::from(pod)));
//!
//! assert_eq!(queue.depth()?, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod event;
pub mod expectations;
pub mod handler;
pub mod lister;
pub mod matcher;
pub mod metrics;
pub mod trigger;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::event::{EventHandler, Object, WatchEvent};
    pub use crate::expectations::{ExpectationTracker, InMemoryExpectations};
    pub use crate::handler::{JobEventHandler, PodEventHandler, TriggerHandlers};
    pub use crate::lister::{InMemoryJobStore, JobLister};
    pub use crate::matcher::{JobMatcher, MatchOutcome, SelectorMatcher};
    pub use crate::metrics::WatchMetrics;
    pub use crate::trigger::{TriggerOutcome, TriggerQueue, TriggerSink};
}
