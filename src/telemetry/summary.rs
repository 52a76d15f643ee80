use crate::errors::SimError;
use crate::models::SatelliteState;
use nalgebra as na;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

struct Summary<'a>(&'a SatelliteState);

fn vector(v: &na::Vector3<f64>) -> String {
    format!("<{}, {}, {}>", v.x, v.y, v.z)
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sat = self.0;
        writeln!(f, "Satellite Initial Configuration")?;
        writeln!(f, "--------------------------------")?;

        writeln!(f, "Moment of Inertia:")?;
        let inertia = sat.inertia_tensor();
        for row in inertia.row_iter() {
            writeln!(f, "[ {:>10.6} {:>10.6} {:>10.6} ]", row[0], row[1], row[2])?;
        }
        writeln!(f)?;

        writeln!(f, "Initial Orientation Vectors:")?;
        writeln!(f, "< x \\n y \\n z >")?;
        for axis in sat.orientation() {
            writeln!(f, "{}", vector(&axis))?;
        }
        writeln!(f)?;

        writeln!(f, "Initial Angular Velocity: {}", vector(&sat.angular_velocity()))?;
        writeln!(f, "Initial Angular Acceleration: {}", vector(&sat.angular_acceleration()))?;

        writeln!(f)?;
        writeln!(f, "Magnetic Moment Details:")?;
        writeln!(f, "Bar Magnet Moment (bar_m): {}", sat.bar_moment())?;
        writeln!(f, "Hysteresis Rods:")?;
        writeln!(f, "Volume: {} m^3", sat.rod_volume())?;
        writeln!(f, "Demag. Factor: {}", sat.demagnetizing_factor())?;
        let [nx, ny, nz] = sat.rod_counts();
        writeln!(f, "Number of Rods - X: {}, Y: {}, Z: {}", nx, ny, nz)
    }
}

pub fn satellite_summary(satellite: &SatelliteState) -> String {
    Summary(satellite).to_string()
}

/// `<dir>/<stem>_satellite_info.txt` next to the telemetry file.
pub fn summary_path(telemetry_path: &Path) -> PathBuf {
    let stem = telemetry_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "simulation".to_string());
    telemetry_path.with_file_name(format!("{}_satellite_info.txt", stem))
}

pub fn write_summary(
    satellite: &SatelliteState,
    telemetry_path: &Path,
) -> Result<PathBuf, SimError> {
    let path = summary_path(telemetry_path);
    fs::write(&path, satellite_summary(satellite))?;
    info!(path = %path.display(), "Wrote satellite summary");
    Ok(path)
}
