use std::collections::HashMap;

use crate::core::EventBatch;
use crate::tasks::{StreamTask, TaskError};
use crate::workflow::adaptation::AdaptationKind;
use thiserror::Error;

pub type TaskId = usize;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("unknown task id {0}")]
    UnknownTask(TaskId),

    #[error("task '{0}' does not publish adaptation events")]
    NotAPublisher(String),

    #[error("task '{0}' does not subscribe to adaptation events")]
    NotASubscriber(String),

    #[error("task '{0}' cannot subscribe to itself")]
    SelfSubscription(String),

    #[error("task '{task}' aborted cycle {cycle}")]
    CycleAborted {
        task: String,
        cycle: u64,
        #[source]
        source: TaskError,
    },
}

/// DAG of stream tasks with two independent edge sets.
///
/// *Data edges* route each task's output batch to its successors every
/// cycle; *adaptation edges* (subscriptions) route a publisher's sparse
/// adaptation events to subscribers, synchronously and in registration
/// order.
///
/// Predecessors must be registered before their successors, so the insertion
/// order of tasks is a topological order of the data edges; cycles visit
/// tasks in exactly that order. Within a task's step, its queued adaptation
/// events are delivered before and directly after its fold, which guarantees
/// that reverse-adapted state is consistent before any task later in the
/// order reads it in the same cycle.
pub struct StreamWorkflow {
    name: String,
    nodes: Vec<Box<dyn StreamTask>>,
    successors: Vec<Vec<TaskId>>,
    predecessors: Vec<Vec<TaskId>>,
    subscriptions: HashMap<(TaskId, AdaptationKind), Vec<TaskId>>,
    last_outputs: Vec<EventBatch>,
    cycle: u64,
}

impl StreamWorkflow {
    pub fn new<N: Into<String>>(name: N) -> StreamWorkflow {
        StreamWorkflow {
            name: name.into(),
            nodes: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            subscriptions: HashMap::new(),
            last_outputs: Vec::new(),
            cycle: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cycles driven so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Adds a task behind the given data-edge predecessors. Tasks without
    /// predecessors are entry tasks and receive the source batch each cycle.
    pub fn add_task(
        &mut self,
        task: Box<dyn StreamTask>,
        preds: &[TaskId],
    ) -> Result<TaskId, WorkflowError> {
        for &pred in preds {
            if pred >= self.nodes.len() {
                return Err(WorkflowError::UnknownTask(pred));
            }
        }

        let id = self.nodes.len();
        self.nodes.push(task);
        self.successors.push(Vec::new());
        self.predecessors.push(preds.to_vec());
        self.last_outputs.push(EventBatch::new());
        for &pred in preds {
            self.successors[pred].push(id);
        }
        Ok(id)
    }

    /// Registers `subscriber` on the publisher's named adaptation channel.
    /// Delivery happens in registration order. Both capabilities are checked
    /// here so delivery itself cannot fail.
    pub fn subscribe(
        &mut self,
        publisher: TaskId,
        kind: AdaptationKind,
        subscriber: TaskId,
    ) -> Result<(), WorkflowError> {
        if publisher >= self.nodes.len() {
            return Err(WorkflowError::UnknownTask(publisher));
        }
        if subscriber >= self.nodes.len() {
            return Err(WorkflowError::UnknownTask(subscriber));
        }
        if publisher == subscriber {
            return Err(WorkflowError::SelfSubscription(
                self.nodes[publisher].name().to_string(),
            ));
        }
        if self.nodes[publisher].as_publisher().is_none() {
            return Err(WorkflowError::NotAPublisher(
                self.nodes[publisher].name().to_string(),
            ));
        }
        if self.nodes[subscriber].as_subscriber().is_none() {
            return Err(WorkflowError::NotASubscriber(
                self.nodes[subscriber].name().to_string(),
            ));
        }

        self.subscriptions
            .entry((publisher, kind))
            .or_default()
            .push(subscriber);
        Ok(())
    }

    pub fn task(&self, id: TaskId) -> Option<&dyn StreamTask> {
        self.nodes.get(id).map(|task| task.as_ref())
    }

    /// Pull-based observer surface: the batch a task emitted in the most
    /// recent cycle.
    pub fn last_output(&self, id: TaskId) -> Option<&EventBatch> {
        self.last_outputs.get(id)
    }

    /// Drives one cycle: entry tasks receive the source batch, every task is
    /// visited in topological order, adaptation events are flushed around
    /// each fold, and output batches flow along the data edges (cloned on
    /// fan-out, merged on fan-in).
    ///
    /// A `TaskError` aborts the cycle immediately; mutations committed by
    /// earlier tasks stay in place.
    pub fn run_cycle(&mut self, batch: EventBatch) -> Result<(), WorkflowError> {
        self.cycle += 1;

        let mut inboxes: Vec<EventBatch> = (0..self.nodes.len())
            .map(|id| {
                if self.predecessors[id].is_empty() {
                    batch.clone()
                } else {
                    EventBatch::new()
                }
            })
            .collect();

        for id in 0..self.nodes.len() {
            self.flush_adaptations(id);

            let mut work = std::mem::take(&mut inboxes[id]);
            if let Err(source) = self.nodes[id].run(&mut work) {
                return Err(WorkflowError::CycleAborted {
                    task: self.nodes[id].name().to_string(),
                    cycle: self.cycle,
                    source,
                });
            }

            // Events raised inside the fold are published within the same
            // step, before any successor consumes the output.
            self.flush_adaptations(id);

            for &succ in &self.successors[id] {
                inboxes[succ].extend(work.iter().map(|(id, event)| (*id, event.clone())));
            }
            self.last_outputs[id] = work;
        }

        Ok(())
    }

    fn flush_adaptations(&mut self, id: TaskId) {
        let events = match self.nodes[id].as_publisher() {
            Some(publisher) => publisher.take_pending(),
            None => return,
        };

        for event in events {
            let subscribers = self
                .subscriptions
                .get(&(id, event.kind()))
                .cloned()
                .unwrap_or_default();
            for subscriber in subscribers {
                if let Some(sub) = self.nodes[subscriber].as_subscriber() {
                    sub.adapt_on_event(&event);
                }
            }
        }
    }
}
