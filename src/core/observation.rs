use crate::core::feature_space::FeatureSpace;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A single data point flowing through the pipeline.
///
/// Ids are assigned by the source and strictly increase over the lifetime of
/// a stream. Observations are owned transiently: tasks consume them from the
/// batch and must not retain them after folding.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: u64,
    pub tstamp: DateTime<Utc>,
    pub values: Vec<f64>,
    pub space: Arc<FeatureSpace>,
}

impl Observation {
    pub fn new(
        id: u64,
        tstamp: DateTime<Utc>,
        values: Vec<f64>,
        space: Arc<FeatureSpace>,
    ) -> Observation {
        Observation {
            id,
            tstamp,
            values,
            space,
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.values.len()
    }

    pub fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}
