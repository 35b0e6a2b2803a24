//! End-to-end classification tests over the full trigger flow with the
//! in-memory collaborators.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use ephjob_core::{
    ContainerPhase, EphemeralContainerStatus, EphemeralJobSnapshot, EphemeralJobSpec, JobKey,
    LabelSelector, PodSnapshot,
};
use ephjob_watch::error::{Error, Result};
use ephjob_watch::event::{EventHandler, Object, WatchEvent};
use ephjob_watch::expectations::{ExpectationTracker, InMemoryExpectations};
use ephjob_watch::handler::{PodEventHandler, TriggerHandlers};
use ephjob_watch::lister::{InMemoryJobStore, JobLister};
use ephjob_watch::matcher::SelectorMatcher;
use ephjob_watch::trigger::{TriggerOutcome, TriggerQueue, TriggerSink};

/// Everything one classification test needs, wired over shared state.
struct Harness {
    store: Arc<InMemoryJobStore>,
    queue: Arc<TriggerQueue>,
    expectations: Arc<InMemoryExpectations>,
    handlers: TriggerHandlers,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryJobStore::new());
        let queue = Arc::new(TriggerQueue::new());
        let expectations = Arc::new(InMemoryExpectations::new());
        let handlers = TriggerHandlers::new(
            Arc::clone(&store) as Arc<dyn JobLister>,
            Arc::new(SelectorMatcher::new()),
            Arc::clone(&expectations) as Arc<dyn ExpectationTracker>,
            Arc::clone(&queue) as Arc<dyn TriggerSink>,
        );
        Self {
            store,
            queue,
            expectations,
            handlers,
        }
    }
}

/// Sink stub recording every trigger call, for exact-count assertions that
/// queue coalescing would otherwise mask.
#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<JobKey>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<JobKey> {
        self.calls.lock().expect("sink lock").clone()
    }
}

impl TriggerSink for RecordingSink {
    fn trigger(&self, key: JobKey) -> Result<TriggerOutcome> {
        self.calls.lock().expect("sink lock").push(key);
        Ok(TriggerOutcome::Enqueued)
    }
}

/// Lister stub that always fails, for the dropped-event path.
struct FailingLister;

impl JobLister for FailingLister {
    fn list_namespace(&self, _namespace: &str) -> Result<Vec<EphemeralJobSnapshot>> {
        Err(Error::lister("watch cache unavailable"))
    }
}

fn web_job(name: &str, container: &str) -> EphemeralJobSnapshot {
    EphemeralJobSnapshot::new("debug", name, "1").with_spec(
        EphemeralJobSpec::new(LabelSelector::new().with_label("app", "web"))
            .with_template_container(container),
    )
}

fn web_pod(resource_version: &str) -> PodSnapshot {
    PodSnapshot::new("debug", "web-0", resource_version).with_label("app", "web")
}

#[test]
fn pod_create_triggers_matching_jobs() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;

    let event = WatchEvent::Created(Object::from(web_pod("5")));
    harness.handlers.pods.handle(&event);

    assert_eq!(harness.queue.drain()?, vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn pod_create_skips_non_matching_jobs() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;
    harness.store.insert(
        EphemeralJobSnapshot::new("debug", "j2", "1").with_spec(EphemeralJobSpec::new(
            LabelSelector::new().with_label("app", "api"),
        )),
    )?;

    harness
        .handlers
        .pods
        .handle(&WatchEvent::Created(Object::from(web_pod("5"))));

    assert_eq!(harness.queue.drain()?, vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn pod_update_with_equal_resource_version_is_ignored() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;
    harness
        .expectations
        .expect(&JobKey::new("debug", "j1"), "c1")?;

    let old = web_pod("5")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Running));
    let new = old.clone();
    harness.handlers.pods.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(harness.queue.depth()?, 0);
    // No expectation observed either.
    assert!(!harness.expectations.satisfied(&JobKey::new("debug", "j1"))?);
    Ok(())
}

#[test]
fn pod_update_with_unchanged_statuses_is_ignored() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;

    let old = web_pod("5")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Running));
    let new = old.clone().with_resource_version("6");
    harness.handlers.pods.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn pod_update_with_status_churn_triggers_and_observes() -> Result<()> {
    let harness = Harness::new();
    let j1 = JobKey::new("debug", "j1");
    let j2 = JobKey::new("debug", "j2");
    harness.store.insert(web_job("j1", "c1"))?;
    harness.store.insert(web_job("j2", "c2"))?;
    harness.expectations.expect(&j1, "c1")?;
    harness.expectations.expect(&j2, "c2")?;

    let old = web_pod("5")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Waiting));
    let new = web_pod("6")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Running))
        .with_container_status(EphemeralContainerStatus::new("c2", ContainerPhase::Running));
    harness.handlers.pods.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert!(harness.expectations.satisfied(&j1)?);
    assert!(harness.expectations.satisfied(&j2)?);
    assert_eq!(harness.queue.drain()?, vec![j1, j2]);
    Ok(())
}

#[test]
fn pod_delete_uses_last_known_snapshot() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;

    let last_known = web_pod("7")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Terminated));
    harness
        .handlers
        .pods
        .handle(&WatchEvent::Deleted(Object::from(last_known)));

    assert_eq!(harness.queue.drain()?, vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn one_trigger_per_job_regardless_of_containers_observed() -> Result<()> {
    let sink = Arc::new(RecordingSink::default());
    let store = Arc::new(InMemoryJobStore::new());
    store.insert(
        EphemeralJobSnapshot::new("debug", "j1", "1").with_spec(
            EphemeralJobSpec::new(LabelSelector::new().with_label("app", "web"))
                .with_template_container("c1")
                .with_template_container("c2"),
        ),
    )?;

    let handler = PodEventHandler::new(
        store,
        Arc::new(SelectorMatcher::new()),
        Arc::new(InMemoryExpectations::new()),
        Arc::clone(&sink) as Arc<dyn TriggerSink>,
    );

    let pod = web_pod("5")
        .with_container_status(EphemeralContainerStatus::new("c1", ContainerPhase::Running))
        .with_container_status(EphemeralContainerStatus::new("c2", ContainerPhase::Running));
    handler.handle(&WatchEvent::Created(Object::from(pod)));

    assert_eq!(sink.calls(), vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn pod_event_is_dropped_when_listing_fails() -> Result<()> {
    let queue = Arc::new(TriggerQueue::new());
    let expectations = Arc::new(InMemoryExpectations::new());
    expectations.expect(&JobKey::new("debug", "j1"), "c1")?;

    let handler = PodEventHandler::new(
        Arc::new(FailingLister),
        Arc::new(SelectorMatcher::new()),
        Arc::clone(&expectations) as Arc<dyn ExpectationTracker>,
        Arc::clone(&queue) as Arc<dyn TriggerSink>,
    );

    handler.handle(&WatchEvent::Created(Object::from(web_pod("5"))));

    assert_eq!(queue.depth()?, 0);
    assert!(!expectations.satisfied(&JobKey::new("debug", "j1"))?);
    Ok(())
}

#[test]
fn pod_handler_ignores_job_payload() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;

    let stray = WatchEvent::Created(Object::from(web_job("j1", "c1")));
    harness.handlers.pods.handle(&stray);

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn job_create_triggers() -> Result<()> {
    let harness = Harness::new();

    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Created(Object::from(web_job("j1", "c1"))));

    assert_eq!(harness.queue.drain()?, vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn job_create_with_deletion_intent_is_ignored() -> Result<()> {
    let harness = Harness::new();

    // A relist can deliver a create for a job that is already terminating.
    let job = web_job("j1", "c1").with_deletion_timestamp(chrono::Utc::now());
    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Created(Object::from(job)));

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn job_update_with_equal_resource_version_is_ignored() -> Result<()> {
    let harness = Harness::new();

    let old = web_job("j1", "c1");
    let new = old.clone();
    harness.handlers.jobs.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn job_update_without_tracked_field_change_is_ignored() -> Result<()> {
    let harness = Harness::new();

    let old = web_job("j1", "c1");
    // Untracked change only (template grows, resource version advances).
    let new = web_job("j1", "c1")
        .with_resource_version("2")
        .with_spec(
            EphemeralJobSpec::new(LabelSelector::new().with_label("app", "web"))
                .with_template_container("c1")
                .with_template_container("c2"),
        );
    harness.handlers.jobs.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn job_update_pause_flip_triggers_once() -> Result<()> {
    let sink = Arc::new(RecordingSink::default());
    let handlers = TriggerHandlers::new(
        Arc::new(InMemoryJobStore::new()),
        Arc::new(SelectorMatcher::new()),
        Arc::new(InMemoryExpectations::new()),
        Arc::clone(&sink) as Arc<dyn TriggerSink>,
    );

    let selector = LabelSelector::new().with_label("app", "web");
    let old = EphemeralJobSnapshot::new("debug", "j1", "1")
        .with_spec(EphemeralJobSpec::new(selector.clone()).with_parallelism(1));
    let new = EphemeralJobSnapshot::new("debug", "j1", "2")
        .with_spec(EphemeralJobSpec::new(selector).with_parallelism(1).with_paused(true));
    handlers.jobs.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(sink.calls(), vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn job_update_with_deletion_intent_triggers_once_and_skips_field_diff() -> Result<()> {
    let sink = Arc::new(RecordingSink::default());
    let handlers = TriggerHandlers::new(
        Arc::new(InMemoryJobStore::new()),
        Arc::new(SelectorMatcher::new()),
        Arc::new(InMemoryExpectations::new()),
        Arc::clone(&sink) as Arc<dyn TriggerSink>,
    );

    let old = web_job("j1", "c1");
    // Deletion intent plus a tracked-field change in the same update: the
    // field diff must not produce a second trigger.
    let new = web_job("j1", "c1")
        .with_resource_version("2")
        .with_deletion_timestamp(chrono::Utc::now())
        .with_spec(
            EphemeralJobSpec::new(LabelSelector::new().with_label("app", "web"))
                .with_parallelism(5),
        );
    handlers.jobs.handle(&WatchEvent::Updated {
        old: Object::from(old),
        new: Object::from(new),
    });

    assert_eq!(sink.calls(), vec![JobKey::new("debug", "j1")]);
    Ok(())
}

#[test]
fn job_delete_clears_expectations_without_trigger() -> Result<()> {
    let harness = Harness::new();
    let key = JobKey::new("debug", "j1");
    harness.expectations.expect(&key, "c1")?;
    harness.expectations.expect(&key, "c2")?;

    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Deleted(Object::from(web_job("j1", "c1"))));

    assert_eq!(harness.queue.depth()?, 0);
    assert!(harness.expectations.satisfied(&key)?);
    Ok(())
}

#[test]
fn job_handler_ignores_pod_payload() -> Result<()> {
    let harness = Harness::new();

    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Created(Object::from(web_pod("5"))));

    assert_eq!(harness.queue.depth()?, 0);
    Ok(())
}

#[test]
fn triggers_coalesce_until_taken() -> Result<()> {
    let harness = Harness::new();
    harness.store.insert(web_job("j1", "c1"))?;
    let key = JobKey::new("debug", "j1");

    // Two significant events for the same job before the reconciler runs.
    harness
        .handlers
        .pods
        .handle(&WatchEvent::Created(Object::from(web_pod("5"))));
    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Created(Object::from(web_job("j1", "c1"))));

    assert_eq!(harness.queue.depth()?, 1);

    // Once taken, the key's deduplication slot is released.
    assert_eq!(harness.queue.take()?, Some(key.clone()));
    harness
        .handlers
        .jobs
        .handle(&WatchEvent::Created(Object::from(web_job("j1", "c1"))));
    assert_eq!(harness.queue.take()?, Some(key));
    Ok(())
}
