use std::io::Error;
use std::sync::Arc;

use crate::core::{FeatureSpace, Observation};
use crate::streams::ObservationSource;
use crate::testing::dummies;

/// Finite in-memory source replaying a fixed list of observations.
pub struct VecSource {
    space: Arc<FeatureSpace>,
    rows: Vec<Observation>,
    idx: usize,
}

impl VecSource {
    pub fn new(rows: Vec<Observation>) -> Self {
        let space = rows
            .first()
            .map(|obs| Arc::clone(&obs.space))
            .unwrap_or_else(|| dummies::space(1));
        Self {
            space,
            rows,
            idx: 0,
        }
    }
}

impl ObservationSource for VecSource {
    fn feature_space(&self) -> &Arc<FeatureSpace> {
        &self.space
    }

    fn has_more_observations(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_observation(&mut self) -> Option<Observation> {
        if !self.has_more_observations() {
            return None;
        }

        let obs = self.rows[self.idx].clone();
        self.idx += 1;
        Some(obs)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
