use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::EventBatch;
use crate::tasks::{AdaptationPublisher, AdaptationSubscriber, StreamTask, TaskError};
use crate::workflow::AdaptationEvent;

/// Shared append-only log the probes below write into, for asserting visit
/// and delivery order.
pub type SharedLog = Rc<RefCell<Vec<String>>>;

pub fn shared_log() -> SharedLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Pass-through task that records its name every time it runs.
pub struct ProbeTask {
    name: String,
    log: SharedLog,
}

impl ProbeTask {
    pub fn new<N: Into<String>>(name: N, log: SharedLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

impl StreamTask for ProbeTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, _batch: &mut EventBatch) -> Result<(), TaskError> {
        self.log.borrow_mut().push(self.name.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Task whose fold always fails.
pub struct FailingTask {
    name: String,
}

impl FailingTask {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl StreamTask for FailingTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, _batch: &mut EventBatch) -> Result<(), TaskError> {
        Err(TaskError::StateInvariantViolation {
            task: self.name.clone(),
            reason: "forced failure".to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Publisher that queues a copy of a fixed adaptation event on every run and
/// otherwise passes data through.
pub struct PulsePublisher {
    name: String,
    event: AdaptationEvent,
    pending: Vec<AdaptationEvent>,
}

impl PulsePublisher {
    pub fn new<N: Into<String>>(name: N, event: AdaptationEvent) -> Self {
        Self {
            name: name.into(),
            event,
            pending: Vec::new(),
        }
    }
}

impl StreamTask for PulsePublisher {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, _batch: &mut EventBatch) -> Result<(), TaskError> {
        self.pending.push(self.event.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_publisher(&mut self) -> Option<&mut dyn AdaptationPublisher> {
        Some(self)
    }
}

impl AdaptationPublisher for PulsePublisher {
    fn take_pending(&mut self) -> Vec<AdaptationEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Subscriber that records its name on every delivery.
pub struct SpySubscriber {
    name: String,
    log: SharedLog,
}

impl SpySubscriber {
    pub fn new<N: Into<String>>(name: N, log: SharedLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

impl StreamTask for SpySubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, _batch: &mut EventBatch) -> Result<(), TaskError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_subscriber(&mut self) -> Option<&mut dyn AdaptationSubscriber> {
        Some(self)
    }
}

impl AdaptationSubscriber for SpySubscriber {
    fn adapt_on_event(&mut self, _event: &AdaptationEvent) {
        self.log.borrow_mut().push(self.name.clone());
    }
}
