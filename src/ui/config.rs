use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumMessage, IntoStaticStr};
use tracing_subscriber::filter::LevelFilter;

/// Verbosity the demo runs with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumMessage,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelChoice {
    #[strum(message = "All", detailed_message = "Debug output from every task.")]
    All,
    #[strum(
        message = "Warnings",
        detailed_message = "Only skipped renormalizations and errors."
    )]
    Warnings,
    #[strum(message = "Nothing", detailed_message = "Silent run.")]
    Nothing,
}

impl LogLevelChoice {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevelChoice::All => LevelFilter::DEBUG,
            LogLevelChoice::Warnings => LevelFilter::WARN,
            LogLevelChoice::Nothing => LevelFilter::OFF,
        }
    }
}

/// Parameters of the demo cascade. Every field has a default, so a config
/// file only needs to name the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub num_features: usize,
    pub num_instances: u64,
    pub window_capacity: usize,
    pub radius: f64,
    pub velocity: f64,
    pub seed: u64,
    pub dst_low: f64,
    pub dst_high: f64,
    pub log_level: LogLevelChoice,
}

impl Default for DemoConfig {
    fn default() -> DemoConfig {
        DemoConfig {
            num_features: 2,
            num_instances: 500,
            window_capacity: 50,
            radius: 200.0,
            velocity: 5.0,
            seed: 13,
            dst_low: -1.0,
            dst_high: 1.0,
            log_level: LogLevelChoice::Warnings,
        }
    }
}

impl DemoConfig {
    pub fn from_json_file(path: &Path) -> Result<DemoConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
