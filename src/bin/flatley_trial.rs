//! Drives a single rod with a sinusoidal field and records its (H, B) loop.

use csv::Writer;
use hystsim::physics::hysteresis::{FlatleyParameters, FlatleyRod, SlopeSign};
use nalgebra as na;
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct TrialRow {
    #[serde(rename = "step")]
    step: u64,
    #[serde(rename = "H(A/m)")]
    h: f64,
    #[serde(rename = "B(T)")]
    b: f64,
    #[serde(rename = "slope")]
    slope: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results/flatley_trial.csv"));
    let iterations: u64 = match env::args().nth(2) {
        Some(n) => n.parse()?,
        None => 1_000_000,
    };

    let timestep = 3.0; // seconds
    let angular_frequency = 0.001; // rad/s
    let amplitude = 100.0; // A/m

    let axis = na::Vector3::x();
    let mut rod = FlatleyRod::new(FlatleyParameters::default(), axis)?;

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut writer = Writer::from_writer(File::create(&output)?);

    for step in 0..iterations {
        let h = amplitude * (angular_frequency * step as f64 * timestep).sin();
        let b = rod.update_field(&(axis * h), &axis);

        writer.serialize(TrialRow {
            step: step + 1,
            h,
            b,
            slope: match rod.slope_sign() {
                SlopeSign::Rising => 1,
                SlopeSign::Falling => 0,
            },
        })?;
    }
    writer.flush()?;

    info!(iterations, path = %output.display(), "Flatley trial written");
    Ok(())
}
