use std::fmt;
use std::time::Instant;

use log::info;

use crate::core::{EventBatch, StreamEvent};
use crate::streams::ObservationSource;
use crate::workflow::graph::{StreamWorkflow, WorkflowError};

/// Outcome of a scenario run.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub cycles: u64,
    pub seconds: f64,
}

impl RunStats {
    pub fn cycles_per_sec(&self) -> f64 {
        if self.seconds > 0.0 {
            self.cycles as f64 / self.seconds
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cycles in {:.3}s ({:.0} cycles/s)",
            self.cycles,
            self.seconds,
            self.cycles_per_sec()
        )
    }
}

/// Binds an observation source to a workflow and drives it cycle by cycle.
///
/// Each cycle takes exactly one observation from the source, wraps it in a
/// single-event `Insert` batch and hands it to the workflow. The run ends
/// when the source is exhausted or the optional cycle limit is reached.
pub struct StreamScenario {
    source: Box<dyn ObservationSource>,
    workflow: StreamWorkflow,
    cycle_limit: Option<u64>,
}

impl StreamScenario {
    pub fn new(
        source: Box<dyn ObservationSource>,
        workflow: StreamWorkflow,
        cycle_limit: Option<u64>,
    ) -> StreamScenario {
        StreamScenario {
            source,
            workflow,
            cycle_limit,
        }
    }

    pub fn workflow(&self) -> &StreamWorkflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut StreamWorkflow {
        &mut self.workflow
    }

    pub fn run(&mut self) -> Result<RunStats, WorkflowError> {
        let start = Instant::now();
        let mut cycles: u64 = 0;

        while self.cycle_limit.is_none_or(|limit| cycles < limit) {
            let Some(obs) = self.source.next_observation() else {
                break;
            };
            let mut batch = EventBatch::new();
            batch.insert(obs.id, StreamEvent::Insert(obs));
            self.workflow.run_cycle(batch)?;
            cycles += 1;
        }

        let stats = RunStats {
            cycles,
            seconds: start.elapsed().as_secs_f64(),
        };
        info!("scenario '{}' finished: {stats}", self.workflow.name());
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streams::DriftingClusterGenerator;
    use crate::tasks::{BoundaryDetector, MovingAverage, NormalizerMinMax, SlidingWindow};
    use crate::testing::{VecSource, observation};
    use crate::workflow::{AdaptationKind, TaskId};

    fn counting_scenario(rows: usize, limit: Option<u64>) -> StreamScenario {
        let source = VecSource::new(
            (1..=rows as u64)
                .map(|id| observation(id, &[id as f64]))
                .collect(),
        );
        let mut wf = StreamWorkflow::new("count");
        wf.add_task(Box::new(MovingAverage::new("ma", true)), &[])
            .unwrap();
        StreamScenario::new(Box::new(source), wf, limit)
    }

    #[test]
    fn stops_at_the_cycle_limit() {
        let mut scenario = counting_scenario(10, Some(4));
        let stats = scenario.run().unwrap();
        assert_eq!(stats.cycles, 4);
        assert_eq!(scenario.workflow().cycle(), 4);
    }

    #[test]
    fn runs_until_the_source_is_exhausted() {
        let mut scenario = counting_scenario(3, None);
        let stats = scenario.run().unwrap();
        assert_eq!(stats.cycles, 3);

        let ma = scenario
            .workflow()
            .task(0)
            .unwrap()
            .as_any()
            .downcast_ref::<MovingAverage>()
            .unwrap();
        assert_eq!(ma.count(), 3);
        assert!((ma.mean().unwrap()[0] - 2.0).abs() < 1e-12);
    }

    struct CascadeIds {
        ma_raw: TaskId,
        normalizer: TaskId,
        ma_normalized: TaskId,
        ma_renormalized: TaskId,
    }

    /// The full demo cascade: a sliding window feeding a raw-average branch
    /// and a boundary-detector/normalizer chain with three averaging branches
    /// behind it (cumulative, windowed, windowed + renormalizing).
    fn cascade_scenario() -> (StreamScenario, CascadeIds) {
        let source = DriftingClusterGenerator::new(2, 200.0, 5.0, Some(300), 13).unwrap();

        let mut wf = StreamWorkflow::new("cascade");
        let window = wf
            .add_task(Box::new(SlidingWindow::new("window", 50).unwrap()), &[])
            .unwrap();
        let ma_raw = wf
            .add_task(Box::new(MovingAverage::new("ma raw", true)), &[window])
            .unwrap();
        let detector = wf
            .add_task(Box::new(BoundaryDetector::new("bd")), &[window])
            .unwrap();
        let normalizer = wf
            .add_task(
                Box::new(NormalizerMinMax::new("norm", -1.0, 1.0).unwrap()),
                &[detector],
            )
            .unwrap();
        wf.add_task(
            Box::new(MovingAverage::new("ma norm cumulative", false)),
            &[normalizer],
        )
        .unwrap();
        let ma_normalized = wf
            .add_task(Box::new(MovingAverage::new("ma norm", true)), &[normalizer])
            .unwrap();
        let ma_renormalized = wf
            .add_task(
                Box::new(MovingAverage::new("ma renorm", true)),
                &[normalizer],
            )
            .unwrap();

        wf.subscribe(detector, AdaptationKind::BoundariesChanged, normalizer)
            .unwrap();
        wf.subscribe(normalizer, AdaptationKind::Recalibrated, ma_renormalized)
            .unwrap();

        let scenario = StreamScenario::new(Box::new(source), wf, None);
        let ids = CascadeIds {
            ma_raw,
            normalizer,
            ma_normalized,
            ma_renormalized,
        };
        (scenario, ids)
    }

    fn mean_of(scenario: &StreamScenario, id: TaskId) -> Vec<f64> {
        scenario
            .workflow()
            .task(id)
            .unwrap()
            .as_any()
            .downcast_ref::<MovingAverage>()
            .unwrap()
            .mean()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn renormalizing_branch_stays_consistent_with_the_final_calibration() {
        let (mut scenario, ids) = cascade_scenario();
        let stats = scenario.run().unwrap();
        assert_eq!(stats.cycles, 300);

        let normalizer = scenario
            .workflow()
            .task(ids.normalizer)
            .unwrap()
            .as_any()
            .downcast_ref::<NormalizerMinMax>()
            .unwrap();
        assert!(
            normalizer.recalibrations() >= 2,
            "drift must force repeated recalibration, got {}",
            normalizer.recalibrations()
        );
        let final_params = normalizer.params().unwrap().clone();

        let mean_raw = mean_of(&scenario, ids.ma_raw);
        let mean_renorm = mean_of(&scenario, ids.ma_renormalized);
        let ma_renorm = scenario
            .workflow()
            .task(ids.ma_renormalized)
            .unwrap()
            .as_any()
            .downcast_ref::<MovingAverage>()
            .unwrap();
        assert_eq!(ma_renorm.renormalization_failures(), 0);

        // The renormalizing branch must agree with the raw mean expressed
        // under the final calibration: folding and the affine map commute.
        let expected = final_params.apply(&mean_raw).unwrap();
        for (got, want) in mean_renorm.iter().zip(&expected) {
            assert!(
                (got - want).abs() < 1e-8,
                "renormalized {mean_renorm:?} vs expected {expected:?}"
            );
        }

        // The branch that never renormalizes mixes values from different
        // calibrations and drifts away from the consistent one.
        let mean_stale = mean_of(&scenario, ids.ma_normalized);
        assert!(
            mean_stale
                .iter()
                .zip(&mean_renorm)
                .any(|(s, r)| (s - r).abs() > 1e-6),
            "stale {mean_stale:?} unexpectedly equals renormalized {mean_renorm:?}"
        );
    }
}
