use std::env;
use std::path::Path;

use anyhow::Result;

use cascata::streams::DriftingClusterGenerator;
use cascata::tasks::{BoundaryDetector, MovingAverage, NormalizerMinMax, SlidingWindow, StreamTask};
use cascata::ui::cli::drivers::InquireDriver;
use cascata::ui::cli::wizard::prompt_config;
use cascata::ui::config::DemoConfig;
use cascata::workflow::{AdaptationKind, StreamScenario, StreamWorkflow, TaskId};

struct Branches {
    raw: TaskId,
    normalizer: TaskId,
    norm_cumulative: TaskId,
    norm_windowed: TaskId,
    renormalized: TaskId,
}

fn build_scenario(config: &DemoConfig) -> Result<(StreamScenario, Branches)> {
    let source = DriftingClusterGenerator::new(
        config.num_features,
        config.radius,
        config.velocity,
        Some(config.num_instances as usize),
        config.seed,
    )?;

    let mut wf = StreamWorkflow::new("cascade demo");
    let window = wf.add_task(
        Box::new(SlidingWindow::new(
            "T1 - Sliding window",
            config.window_capacity,
        )?),
        &[],
    )?;
    let raw = wf.add_task(
        Box::new(MovingAverage::new("T2 - Moving average (raw)", true)),
        &[window],
    )?;
    let detector = wf.add_task(Box::new(BoundaryDetector::new("T3 - Boundary detector")), &[
        window,
    ])?;
    let normalizer = wf.add_task(
        Box::new(NormalizerMinMax::new(
            "T4 - Normalizer min-max",
            config.dst_low,
            config.dst_high,
        )?),
        &[detector],
    )?;
    let norm_cumulative = wf.add_task(
        Box::new(MovingAverage::new(
            "T5 - Moving average (normalized +)",
            false,
        )),
        &[normalizer],
    )?;
    let norm_windowed = wf.add_task(
        Box::new(MovingAverage::new(
            "T6 - Moving average (normalized +/-)",
            true,
        )),
        &[normalizer],
    )?;
    let renormalized = wf.add_task(
        Box::new(MovingAverage::new(
            "T7 - Moving average (renormalized +/-)",
            true,
        )),
        &[normalizer],
    )?;

    wf.subscribe(detector, AdaptationKind::BoundariesChanged, normalizer)?;
    wf.subscribe(normalizer, AdaptationKind::Recalibrated, renormalized)?;

    let scenario = StreamScenario::new(Box::new(source), wf, Some(config.num_instances));
    Ok((scenario, Branches {
        raw,
        normalizer,
        norm_cumulative,
        norm_windowed,
        renormalized,
    }))
}

fn report(scenario: &StreamScenario, branches: &Branches) {
    let wf = scenario.workflow();

    for id in [
        branches.raw,
        branches.norm_cumulative,
        branches.norm_windowed,
        branches.renormalized,
    ] {
        let Some(task) = wf.task(id) else { continue };
        let Some(ma) = task.as_any().downcast_ref::<MovingAverage>() else {
            continue;
        };
        match ma.mean() {
            Some(mean) => {
                let values: Vec<String> = mean.iter().map(|v| format!("{v:>12.4}")).collect();
                println!(
                    "{:<42} [{}]  (count {})",
                    ma.name(),
                    values.join(", "),
                    ma.count()
                );
            }
            None => println!("{:<42} (no data)", ma.name()),
        }
        if ma.renormalization_failures() > 0 {
            println!(
                "{:<42} {} renormalizations skipped",
                "",
                ma.renormalization_failures()
            );
        }
    }

    if let Some(normalizer) = wf
        .task(branches.normalizer)
        .and_then(|task| task.as_any().downcast_ref::<NormalizerMinMax>())
    {
        println!(
            "{:<42} {} recalibrations",
            normalizer.name(),
            normalizer.recalibrations()
        );
    }
}

fn main() -> Result<()> {
    println!("Cascaded stream workflow with reverse adaptation");
    println!("------------------------------------------------");

    let config = match env::args().nth(1) {
        Some(path) => DemoConfig::from_json_file(Path::new(&path))?,
        None => prompt_config(&InquireDriver)?,
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level.level_filter())
        .init();

    let (mut scenario, branches) = build_scenario(&config)?;
    let stats = scenario.run()?;

    println!();
    report(&scenario, &branches);
    println!();
    println!("{stats}");
    Ok(())
}
