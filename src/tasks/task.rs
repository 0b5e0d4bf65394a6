use crate::core::EventBatch;
use crate::workflow::AdaptationEvent;
use std::any::Any;
use thiserror::Error;

/// Unrecoverable failure raised by a task's fold step. Aborts the running
/// cycle and halts the pipeline.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("state invariant violated in task '{task}': {reason}")]
    StateInvariantViolation { task: String, reason: String },
}

/// A stage of the cascade.
///
/// The fold capability is mandatory; publishing and subscribing to
/// adaptation events are optional capabilities a task opts into by returning
/// `Some(self)` from the corresponding accessor.
pub trait StreamTask {
    fn name(&self) -> &str;

    /// One fold step: consumes this cycle's batch in place and leaves the
    /// task's output events in it for downstream consumers.
    fn run(&mut self, batch: &mut EventBatch) -> Result<(), TaskError>;

    /// Downcast hook for pull-based observers (sinks, demo reporting).
    fn as_any(&self) -> &dyn Any;

    fn as_publisher(&mut self) -> Option<&mut dyn AdaptationPublisher> {
        None
    }

    fn as_subscriber(&mut self) -> Option<&mut dyn AdaptationSubscriber> {
        None
    }
}

/// Capability of tasks that emit adaptation events.
pub trait AdaptationPublisher {
    /// Drains the events queued since the last drain, in publication order.
    fn take_pending(&mut self) -> Vec<AdaptationEvent>;
}

/// Capability of tasks that react to a publisher's adaptation events.
///
/// Delivery is synchronous; a failing reaction must be absorbed (and logged)
/// locally and must never abort the running cycle.
pub trait AdaptationSubscriber {
    fn adapt_on_event(&mut self, event: &AdaptationEvent);
}
