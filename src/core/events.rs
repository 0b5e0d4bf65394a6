use crate::core::observation::Observation;
use std::collections::BTreeMap;
use strum_macros::Display;

/// Tag for the two possible event kinds. Closed on purpose: the pipeline
/// protocol knows insertions and evictions, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EventKind {
    Insert,
    Evict,
}

/// An observation entering (`Insert`) or leaving (`Evict`) the active set.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Insert(Observation),
    Evict(Observation),
}

impl StreamEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StreamEvent::Insert(_) => EventKind::Insert,
            StreamEvent::Evict(_) => EventKind::Evict,
        }
    }

    pub fn observation(&self) -> &Observation {
        match self {
            StreamEvent::Insert(obs) | StreamEvent::Evict(obs) => obs,
        }
    }

    pub fn observation_mut(&mut self) -> &mut Observation {
        match self {
            StreamEvent::Insert(obs) | StreamEvent::Evict(obs) => obs,
        }
    }

    pub fn into_observation(self) -> Observation {
        match self {
            StreamEvent::Insert(obs) | StreamEvent::Evict(obs) => obs,
        }
    }
}

/// The per-cycle unit handed between tasks: events keyed by observation id.
pub type EventBatch = BTreeMap<u64, StreamEvent>;
