use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::core::{EventBatch, EventKind, FeatureSpace, Observation, StreamEvent};
use crate::tasks::task::{AdaptationSubscriber, StreamTask, TaskError};
use crate::workflow::AdaptationEvent;

/// Incremental running average over the currently active observations.
///
/// Per cycle, the whole input batch is folded into the stored `(mean, count)`
/// pair and replaced by a single synthetic `Insert` carrying the new mean.
/// The mean is maintained algebraically; no raw history is retained.
///
/// With `track_evictions` disabled, `Evict` events are ignored entirely and
/// the task accumulates monotonically over everything ever seen, which serves
/// as a control branch against the reverse-adapted one.
///
/// The task also implements the reverse-adaptation hook: when subscribed to a
/// normalizer's `Recalibrated` channel, the stored mean is re-expressed under
/// the new calibration without replaying any observations.
pub struct MovingAverage {
    name: String,
    mean: Option<Vec<f64>>,
    count: u64,
    track_evictions: bool,
    current_value: Option<Vec<f64>>,
    renormalization_failures: u64,
}

impl MovingAverage {
    pub fn new<N: Into<String>>(name: N, track_evictions: bool) -> MovingAverage {
        MovingAverage {
            name: name.into(),
            mean: None,
            count: 0,
            track_evictions,
            current_value: None,
            renormalization_failures: 0,
        }
    }

    pub fn mean(&self) -> Option<&[f64]> {
        self.mean.as_deref()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Observable mean as of the last emitted summary. Write-only from the
    /// aggregator's perspective; read by sinks, never by the fold itself.
    pub fn current_value(&self) -> Option<&[f64]> {
        self.current_value.as_deref()
    }

    /// Number of renormalization notifications that had to be skipped.
    pub fn renormalization_failures(&self) -> u64 {
        self.renormalization_failures
    }

    fn fold_insert(&mut self, values: &[f64]) {
        match &mut self.mean {
            None => {
                self.mean = Some(values.to_vec());
                self.count = 1;
            }
            Some(mean) => {
                let n = self.count as f64;
                for (m, v) in mean.iter_mut().zip(values) {
                    *m = (*m * n + v) / (n + 1.0);
                }
                self.count += 1;
            }
        }
    }

    fn fold_evict(&mut self, values: &[f64]) -> Result<(), TaskError> {
        let Some(mean) = &mut self.mean else {
            return Err(TaskError::StateInvariantViolation {
                task: self.name.clone(),
                reason: "eviction from an empty aggregate".to_string(),
            });
        };
        if self.count == 1 {
            // Window drained; the mean is undefined again.
            self.mean = None;
            self.count = 0;
        } else {
            let n = self.count as f64;
            for (m, v) in mean.iter_mut().zip(values) {
                *m = (*m * n - v) / (n - 1.0);
            }
            self.count -= 1;
        }
        Ok(())
    }
}

impl StreamTask for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, batch: &mut EventBatch) -> Result<(), TaskError> {
        let mut summary_id: Option<u64> = None;
        let mut summary_tstamp: Option<DateTime<Utc>> = None;
        let mut summary_space: Option<Arc<FeatureSpace>> = None;
        let mut processed = false;

        for (&id, event) in batch.iter() {
            let obs = event.observation();
            match event.kind() {
                EventKind::Insert => {
                    self.fold_insert(&obs.values);
                    processed = true;
                }
                EventKind::Evict if self.track_evictions => {
                    self.fold_evict(&obs.values)?;
                    processed = true;
                }
                EventKind::Evict => {}
            }

            // The output identity comes from the max-id observation of the
            // whole batch, ignored evictions included.
            if summary_id.is_none_or(|max| id > max) {
                summary_id = Some(id);
                summary_tstamp = Some(obs.tstamp);
                summary_space = Some(Arc::clone(&obs.space));
            }
        }

        if !processed {
            // Empty batch or nothing but ignored evictions: no emission, no
            // state change.
            return Ok(());
        }

        batch.clear();

        let Some(mean) = &self.mean else {
            // Tracked evictions drained the window; nothing to summarize.
            return Ok(());
        };
        let (Some(id), Some(tstamp), Some(space)) = (summary_id, summary_tstamp, summary_space)
        else {
            return Ok(());
        };

        let summary = Observation::new(id, tstamp, mean.clone(), space);
        batch.insert(id, StreamEvent::Insert(summary));
        self.current_value = Some(mean.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_subscriber(&mut self) -> Option<&mut dyn AdaptationSubscriber> {
        Some(self)
    }
}

impl AdaptationSubscriber for MovingAverage {
    fn adapt_on_event(&mut self, event: &AdaptationEvent) {
        let AdaptationEvent::Recalibrated(renormalization) = event else {
            return;
        };
        let Some(mean) = &self.mean else {
            // Nothing accumulated yet; the next insert already arrives under
            // the new calibration.
            return;
        };
        match renormalization.apply(mean) {
            Ok(renormalized) => {
                debug!("task '{}': moving average renormalized", self.name);
                self.mean = Some(renormalized);
            }
            Err(e) => {
                self.renormalization_failures += 1;
                warn!("task '{}': renormalization skipped: {e}", self.name);
            }
        }
    }
}
