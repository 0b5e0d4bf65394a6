use std::fmt::{Display, Formatter};

use anyhow::Result;
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::config::{DemoConfig, LogLevelChoice};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

struct LevelItem {
    choice: LogLevelChoice,
    text: String,
}

impl Display for LevelItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn level_items() -> Vec<LevelItem> {
    LogLevelChoice::iter()
        .map(|choice| {
            let label = choice.get_message().unwrap_or_else(|| choice.into());
            let desc = choice.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            LevelItem { choice, text }
        })
        .collect()
}

/// Interactive walk through every demo parameter, starting from the
/// defaults.
pub fn prompt_config<D: PromptDriver>(driver: &D) -> Result<DemoConfig> {
    let defaults = DemoConfig::default();

    let num_features = driver.ask_u64(
        "Number of features",
        "Dimensionality of the generated observations",
        defaults.num_features as u64,
        Some(1),
        None,
    )? as usize;
    let num_instances = driver.ask_u64(
        "Number of instances",
        "Observations to stream before stopping",
        defaults.num_instances,
        Some(1),
        None,
    )?;
    let window_capacity = driver.ask_u64(
        "Window capacity",
        "Observations the sliding window retains",
        defaults.window_capacity as u64,
        Some(1),
        None,
    )? as usize;
    let radius = driver.ask_f64(
        "Cluster radius",
        "Half-width of the hypercube points are drawn from",
        defaults.radius,
        Some(f64::MIN_POSITIVE),
        None,
    )?;
    let velocity = driver.ask_f64(
        "Drift velocity",
        "Units the cluster center moves per instance",
        defaults.velocity,
        Some(0.0),
        None,
    )?;
    let seed = driver.ask_u64("Seed", "Generator seed", defaults.seed, None, None)?;
    let dst_low = driver.ask_f64(
        "Normalization lower bound",
        "Lower end of the destination range",
        defaults.dst_low,
        None,
        None,
    )?;
    let dst_high = driver.ask_f64(
        "Normalization upper bound",
        "Upper end of the destination range, must exceed the lower bound",
        defaults.dst_high,
        Some(dst_low),
        None,
    )?;
    let log_level = prompt_log_level()?;

    Ok(DemoConfig {
        num_features,
        num_instances,
        window_capacity,
        radius,
        velocity,
        seed,
        dst_low,
        dst_high,
        log_level,
    })
}

fn prompt_log_level() -> Result<LogLevelChoice> {
    let selected = inquire::Select::new("Log verbosity:", level_items()).prompt()?;
    Ok(selected.choice)
}
