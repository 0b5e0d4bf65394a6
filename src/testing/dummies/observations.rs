use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::{EventBatch, FeatureSpace, Observation, StreamEvent};

pub fn space(dim: usize) -> Arc<FeatureSpace> {
    FeatureSpace::with_dimensionality("test", dim)
}

/// Observation with a deterministic timestamp derived from its id, so
/// assertions on summary identity stay reproducible.
pub fn observation(id: u64, values: &[f64]) -> Observation {
    Observation::new(
        id,
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(id as i64),
        values.to_vec(),
        space(values.len()),
    )
}

pub fn batch_of(events: &[StreamEvent]) -> EventBatch {
    events
        .iter()
        .map(|event| (event.observation().id, event.clone()))
        .collect()
}
