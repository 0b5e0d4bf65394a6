use std::any::Any;

use log::debug;

use crate::core::{Boundaries, EventBatch, StreamEvent};
use crate::tasks::task::{AdaptationPublisher, StreamTask, TaskError};
use crate::workflow::AdaptationEvent;

/// Tracks per-dimension value boundaries of everything inserted so far and
/// publishes a `BoundariesChanged` event whenever they widen.
///
/// Data passes through untouched; the detector is an observer on the data
/// path. Evictions never shrink the boundaries (see `Boundaries`).
pub struct BoundaryDetector {
    name: String,
    bounds: Option<Boundaries>,
    pending: Vec<AdaptationEvent>,
}

impl BoundaryDetector {
    pub fn new<N: Into<String>>(name: N) -> BoundaryDetector {
        BoundaryDetector {
            name: name.into(),
            bounds: None,
            pending: Vec::new(),
        }
    }

    pub fn boundaries(&self) -> Option<&Boundaries> {
        self.bounds.as_ref()
    }
}

impl StreamTask for BoundaryDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, batch: &mut EventBatch) -> Result<(), TaskError> {
        let mut changed = false;

        for event in batch.values() {
            let StreamEvent::Insert(obs) = event else {
                continue;
            };
            let bounds = self
                .bounds
                .get_or_insert_with(|| Boundaries::new(obs.dimensionality()));
            changed |= bounds.expand(&obs.values);
        }

        if changed {
            if let Some(bounds) = &self.bounds {
                debug!("task '{}': boundaries widened", self.name);
                self.pending
                    .push(AdaptationEvent::BoundariesChanged(bounds.clone()));
            }
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_publisher(&mut self) -> Option<&mut dyn AdaptationPublisher> {
        Some(self)
    }
}

impl AdaptationPublisher for BoundaryDetector {
    fn take_pending(&mut self) -> Vec<AdaptationEvent> {
        std::mem::take(&mut self.pending)
    }
}
