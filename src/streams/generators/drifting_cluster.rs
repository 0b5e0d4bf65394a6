use std::io::{Error, ErrorKind};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{FeatureSpace, Observation};
use crate::streams::source::ObservationSource;

/// Generator of a single cluster whose center drifts with constant velocity.
///
/// Points are drawn uniformly from a hypercube of half-width `radius` around
/// the current center; the center starts at the origin and moves `speed`
/// units per produced observation along a random (seeded) direction. This is
/// the classic drifting-stream setup used to exercise recalibration.
#[derive(Debug)]
pub struct DriftingClusterGenerator {
    seed: u64,
    rng: StdRng,
    center: Vec<f64>,
    velocity: Vec<f64>,
    speed: f64,
    radius: f64,
    space: Arc<FeatureSpace>,
    start: DateTime<Utc>,
    max_instances: Option<usize>,
    produced: usize,
}

impl DriftingClusterGenerator {
    pub fn new(
        num_features: usize,
        radius: f64,
        speed: f64,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if num_features == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Number of features must be > 0",
            ));
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Radius must be finite and > 0",
            ));
        }
        if !speed.is_finite() || speed < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Speed must be finite and >= 0",
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let velocity = Self::draw_velocity(&mut rng, num_features, speed);

        Ok(Self {
            seed,
            rng,
            center: vec![0.0; num_features],
            velocity,
            speed,
            radius,
            space: FeatureSpace::with_dimensionality("DriftingCluster", num_features),
            start: Utc::now(),
            max_instances,
            produced: 0,
        })
    }

    /// Random direction scaled to `speed`. Falls back to the first axis for
    /// the (measure-zero) all-zero draw.
    fn draw_velocity(rng: &mut StdRng, dim: usize, speed: f64) -> Vec<f64> {
        let mut direction: Vec<f64> = (0..dim).map(|_| rng.random_range(-1.0..=1.0)).collect();
        let norm = direction.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            direction[0] = 1.0;
            direction.iter().map(|v| v * speed).collect()
        } else {
            direction.iter().map(|v| v / norm * speed).collect()
        }
    }
}

impl ObservationSource for DriftingClusterGenerator {
    fn feature_space(&self) -> &Arc<FeatureSpace> {
        &self.space
    }

    fn has_more_observations(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_observation(&mut self) -> Option<Observation> {
        if !self.has_more_observations() {
            return None;
        }

        let values: Vec<f64> = self
            .center
            .iter()
            .map(|c| c + self.rng.random_range(-self.radius..=self.radius))
            .collect();

        for (c, v) in self.center.iter_mut().zip(&self.velocity) {
            *c += v;
        }

        let id = self.produced as u64 + 1;
        let tstamp = self.start + TimeDelta::seconds(self.produced as i64);
        self.produced += 1;

        Some(Observation::new(id, tstamp, values, Arc::clone(&self.space)))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.velocity = Self::draw_velocity(&mut self.rng, self.center.len(), self.speed);
        self.center.iter_mut().for_each(|c| *c = 0.0);
        self.produced = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase_and_limit_is_respected() {
        let mut generator = DriftingClusterGenerator::new(2, 10.0, 1.0, Some(5), 42).unwrap();
        let mut last_id = 0;
        let mut produced = 0;
        while let Some(obs) = generator.next_observation() {
            assert!(obs.id > last_id);
            assert_eq!(obs.dimensionality(), 2);
            last_id = obs.id;
            produced += 1;
        }
        assert_eq!(produced, 5);
        assert!(!generator.has_more_observations());
    }

    #[test]
    fn zero_speed_keeps_points_inside_the_initial_hypercube() {
        let mut generator = DriftingClusterGenerator::new(3, 50.0, 0.0, Some(100), 7).unwrap();
        while let Some(obs) = generator.next_observation() {
            assert!(obs.values.iter().all(|v| v.abs() <= 50.0), "{:?}", obs.values);
        }
    }

    #[test]
    fn restart_resets_sequence_with_same_seed() {
        let mut generator = DriftingClusterGenerator::new(2, 200.0, 5.0, Some(30), 13).unwrap();
        let first: Vec<Vec<f64>> = (0..30)
            .map(|_| generator.next_observation().unwrap().values)
            .collect();
        generator.restart().unwrap();
        let second: Vec<Vec<f64>> = (0..30)
            .map(|_| generator.next_observation().unwrap().values)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = DriftingClusterGenerator::new(0, 1.0, 1.0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = DriftingClusterGenerator::new(2, 0.0, 1.0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = DriftingClusterGenerator::new(2, 1.0, -1.0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
