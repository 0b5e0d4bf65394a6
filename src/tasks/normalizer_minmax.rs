use std::any::Any;
use std::io::{Error, ErrorKind};

use log::debug;

use crate::core::EventBatch;
use crate::tasks::task::{AdaptationPublisher, AdaptationSubscriber, StreamTask, TaskError};
use crate::workflow::{AdaptationEvent, MinMaxParams, Renormalization};

/// Min-max normalizer mapping every dimension onto a destination range.
///
/// Calibration is event-driven: the normalizer subscribes to a boundary
/// detector's `BoundariesChanged` channel, derives fresh affine parameters on
/// every notification and publishes a `Recalibrated` event carrying the
/// old-to-new [`Renormalization`] for reverse-adapting subscribers.
///
/// On the data path, every observation of the batch (evictions included) is
/// rewritten under the *current* parameters. Before the first calibration the
/// batch passes through untouched.
#[derive(Debug)]
pub struct NormalizerMinMax {
    name: String,
    dst_low: f64,
    dst_high: f64,
    params: Option<MinMaxParams>,
    recalibrations: u64,
    pending: Vec<AdaptationEvent>,
}

impl NormalizerMinMax {
    pub fn new<N: Into<String>>(
        name: N,
        dst_low: f64,
        dst_high: f64,
    ) -> Result<NormalizerMinMax, Error> {
        if !dst_low.is_finite() || !dst_high.is_finite() || dst_low >= dst_high {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Destination range must be finite with low < high",
            ));
        }
        Ok(NormalizerMinMax {
            name: name.into(),
            dst_low,
            dst_high,
            params: None,
            recalibrations: 0,
            pending: Vec::new(),
        })
    }

    pub fn params(&self) -> Option<&MinMaxParams> {
        self.params.as_ref()
    }

    pub fn recalibrations(&self) -> u64 {
        self.recalibrations
    }
}

impl StreamTask for NormalizerMinMax {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, batch: &mut EventBatch) -> Result<(), TaskError> {
        let Some(params) = &self.params else {
            return Ok(());
        };

        for event in batch.values_mut() {
            let obs = event.observation_mut();
            obs.values = params.apply(&obs.values).map_err(|e| {
                // A mismatched observation on the data path means the stream
                // schema is broken; that is not a recoverable calibration
                // problem.
                TaskError::StateInvariantViolation {
                    task: self.name.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_publisher(&mut self) -> Option<&mut dyn AdaptationPublisher> {
        Some(self)
    }

    fn as_subscriber(&mut self) -> Option<&mut dyn AdaptationSubscriber> {
        Some(self)
    }
}

impl AdaptationPublisher for NormalizerMinMax {
    fn take_pending(&mut self) -> Vec<AdaptationEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl AdaptationSubscriber for NormalizerMinMax {
    fn adapt_on_event(&mut self, event: &AdaptationEvent) {
        let AdaptationEvent::BoundariesChanged(bounds) = event else {
            return;
        };
        if !bounds.is_defined() {
            return;
        }

        let new_params = MinMaxParams::from_boundaries(bounds, self.dst_low, self.dst_high);
        let previous = self.params.replace(new_params.clone());
        self.recalibrations += 1;
        debug!(
            "task '{}': recalibrated ({} so far)",
            self.name, self.recalibrations
        );
        self.pending
            .push(AdaptationEvent::Recalibrated(Renormalization::new(
                previous, new_params,
            )));
    }
}
