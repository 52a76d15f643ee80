//! Debug scenario: spin about z in a synthetic field confined to the x-y plane.

use hystsim::config::SpacecraftConfig;
use hystsim::integrators::IntegratorKind;
use hystsim::io::synthetic::sinusoidal_field;
use hystsim::models::{SatelliteState, Timestamp};
use hystsim::physics::hysteresis::FlatleyParameters;
use hystsim::simulation::{Simulation, TimestepPolicy};
use hystsim::telemetry::summary::write_summary;
use hystsim::telemetry::CsvTelemetryWriter;
use nalgebra as na;
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results/aligned_spin.csv"));

    let field_start = Timestamp::parse("01 Oct 2025 06:30:00.000")?;
    let start = Timestamp::parse("01 Oct 2025 07:00:00.000")?;
    let stop = Timestamp::parse("01 Oct 2025 08:00:00.000")?;

    // B = (Bz, Bz, 0) with Bz = 25 sin(2 pi t / 900)
    let field = sinusoidal_field(field_start, 6000, 1.0, 900.0, na::Vector3::new(25.0, 25.0, 0.0));

    let config = SpacecraftConfig {
        angular_velocity: [0.0, 0.0, 0.6],
        angular_acceleration: [0.0, 0.0, 0.00001],
        hysteresis: FlatleyParameters {
            retentivity: 0.04,
            saturation: 0.27,
            ..FlatleyParameters::default()
        },
        ..SpacecraftConfig::default()
    };
    let satellite = SatelliteState::new(&config)?;

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    write_summary(&satellite, &output)?;

    let mut writer = CsvTelemetryWriter::create(&output)?;
    let mut simulation = Simulation::new(&field, start, stop, TimestepPolicy::Fixed(1.0))?
        .with_integrator(IntegratorKind::Euler);
    let summary = simulation.run(satellite, &mut writer)?;

    info!(steps = summary.steps, path = %output.display(), "Aligned spin written");
    Ok(())
}
