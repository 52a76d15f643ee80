use hystsim::config::RunConfig;
use hystsim::io::field_loader::load_vector_file;
use hystsim::models::SatelliteState;
use hystsim::simulation::Simulation;
use hystsim::telemetry::summary::write_summary;
use hystsim::telemetry::CsvTelemetryWriter;
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Without a config file, run the PMAC reference case
    let config = match env::args().nth(1) {
        Some(path) => RunConfig::load(Path::new(&path))?,
        None => RunConfig::default(),
    };
    let sim_config = &config.simulation;
    sim_config.validate()?;

    let (field, report) = load_vector_file(
        &sim_config.field.path,
        &sim_config.field.columns,
        sim_config.field.unit_scale,
    )?;
    info!(samples = report.loaded, skipped = report.skipped, "Read magnetic field data");

    let satellite = SatelliteState::new(&config.spacecraft)?;
    info!("Initialised satellite");

    let output = sim_config.output.with_extension("csv");
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    write_summary(&satellite, &output)?;

    let mut writer = CsvTelemetryWriter::create(&output)?;
    let mut simulation = Simulation::from_config(sim_config, &field)?;
    let summary = simulation.run(satellite, &mut writer)?;

    info!(
        steps = summary.steps,
        rows = writer.rows(),
        path = %output.display(),
        "Simulation data written"
    );
    Ok(())
}
