use super::spacecraft::SpacecraftConfig;
use crate::constants::{DEFAULT_MIN_TIMESTEP, NT_TO_A_PER_M};
use crate::errors::SimError;
use crate::integrators::IntegratorKind;
use crate::io::field_loader::FieldColumns;
use crate::models::Timestamp;
use crate::simulation::timestep::TimestepPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the ambient field comes from and how to convert it to A/m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSourceConfig {
    pub path: PathBuf,
    pub columns: FieldColumns,
    pub unit_scale: f64,
}

impl Default for FieldSourceConfig {
    fn default() -> Self {
        FieldSourceConfig {
            path: PathBuf::from("data/igrf-icrf_55_10d-1s.csv"),
            columns: FieldColumns::default(),
            unit_scale: NT_TO_A_PER_M,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start: String,
    pub stop: String,
    /// Fixed step, or the largest step when adaptive (s)
    pub timestep: f64,
    pub adaptive_timestep: bool,
    pub min_timestep: f64,
    pub integrator: IntegratorKind,
    pub apply_bar_magnet: bool,
    pub reorthonormalize_every: Option<u64>,
    pub field: FieldSourceConfig,
    pub output: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            start: "01 Oct 2025 07:00:00.000".to_string(),
            stop: "01 Oct 2025 14:00:00.000".to_string(),
            timestep: 1.0,
            adaptive_timestep: false,
            min_timestep: DEFAULT_MIN_TIMESTEP,
            integrator: IntegratorKind::default(),
            apply_bar_magnet: false,
            reorthonormalize_every: None,
            field: FieldSourceConfig::default(),
            output: PathBuf::from("results/shared_data.csv"),
        }
    }
}

impl SimulationConfig {
    pub fn start_time(&self) -> Result<Timestamp, SimError> {
        Timestamp::parse(&self.start)
    }

    pub fn stop_time(&self) -> Result<Timestamp, SimError> {
        Timestamp::parse(&self.stop)
    }

    pub fn timestep_policy(&self) -> TimestepPolicy {
        if self.adaptive_timestep {
            TimestepPolicy::Adaptive {
                min: self.min_timestep,
                max: self.timestep,
            }
        } else {
            TimestepPolicy::Fixed(self.timestep)
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let start = self.start_time()?;
        let stop = self.stop_time()?;
        if stop < start {
            return Err(SimError::InvalidParameter(format!(
                "stop time {} is before start time {}",
                stop, start
            )));
        }
        self.timestep_policy().validate()?;
        if self.reorthonormalize_every == Some(0) {
            return Err(SimError::InvalidParameter(
                "reorthonormalize_every must be at least 1".to_string(),
            ));
        }
        if !(self.field.unit_scale.is_finite() && self.field.unit_scale != 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "field unit scale must be finite and nonzero, got {}",
                self.field.unit_scale
            )));
        }
        Ok(())
    }
}

/// Everything one run needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub spacecraft: SpacecraftConfig,
    pub simulation: SimulationConfig,
}

impl RunConfig {
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, SimError> {
        let config: RunConfig = serde_json::from_reader(reader)?;
        config.simulation.validate()?;
        config.spacecraft.hysteresis.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        info!(path = %path.display(), "Loading run configuration");
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}
