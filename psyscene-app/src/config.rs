use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, ensure};
use serde::Deserialize;

/// Session parameters; every field falls back to its default when absent
/// from the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub trials: usize,
    pub fixation_range_ms: (u64, u64),
    pub response_window_ms: u64,
    pub feedback_duration_ms: u64,
    /// Font for the "GO" stimulus and feedback text; without one both fall
    /// back to shapes and blank screens.
    pub font_path: Option<PathBuf>,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub simulation: SimulationConfig,
}

/// Offscreen display and simulated participant used by `--simulate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f64,
    pub rt_range_ms: (u64, u64),
    pub miss_rate: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trials: 20,
            fixation_range_ms: (500, 1500),
            response_window_ms: 2000,
            feedback_duration_ms: 500,
            font_path: None,
            output: PathBuf::from("experiment_results.json"),
            seed: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            refresh_rate: 60.0,
            rt_range_ms: (250, 600),
            miss_rate: 0.1,
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.fixation_range_ms;
        ensure!(lo <= hi, "fixation_range_ms must be ascending, got ({lo}, {hi})");
        let (lo, hi) = self.simulation.rt_range_ms;
        ensure!(lo <= hi, "rt_range_ms must be ascending, got ({lo}, {hi})");
        ensure!(
            (0.0..=1.0).contains(&self.simulation.miss_rate),
            "miss_rate must lie in [0, 1]"
        );
        Ok(())
    }

    pub fn response_window(&self) -> f64 {
        self.response_window_ms as f64 / 1000.0
    }

    pub fn feedback_duration(&self) -> f64 {
        self.feedback_duration_ms as f64 / 1000.0
    }
}
