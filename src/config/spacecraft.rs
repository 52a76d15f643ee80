use crate::numerics::rotation::Triad;
use crate::physics::hysteresis::{FlatleyParameters, HysteresisMode};
use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Physical description of the satellite at the start of a run.
///
/// Defaults reproduce the PMAC reference cubesat: two rod banks of three
/// HyMu-80 rods on the x and y axes, tumbling at 0.6 rad/s about each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacecraftConfig {
    /// Row-major inertia tensor (kg m^2)
    pub inertia: [f64; 9],
    /// Initial body x, y and z axes in the inertial frame
    pub orientation: [[f64; 3]; 3],
    pub angular_velocity: [f64; 3],
    pub angular_acceleration: [f64; 3],

    /// Permanent magnet moment (A m^2) and its body-frame direction
    pub bar_moment: f64,
    pub bar_direction: [f64; 3],

    /// Volume of one hysteresis rod (m^3)
    pub rod_volume: f64,
    pub demagnetizing_factor: f64,
    /// Number of rods along body x, y and z
    pub rod_counts: [u32; 3],

    pub hysteresis: FlatleyParameters,
    pub hysteresis_mode: HysteresisMode,
    /// Per-update projection change (A/m) inside which the rod keeps its slope sign
    pub slope_tolerance: f64,
}

impl Default for SpacecraftConfig {
    #[rustfmt::skip]
    fn default() -> Self {
        SpacecraftConfig {
            inertia: [
                0.0067, 0.0000, 0.0000,
                0.0003, 0.0333, 0.0000,
                0.0000, 0.0000, 0.0333,
            ],
            orientation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            angular_velocity: [0.6, 0.6, 0.6],
            angular_acceleration: [0.00001, 0.0, 0.0],
            bar_moment: 12.0,
            bar_direction: [0.0, 0.0, 1.0],
            rod_volume: 7.4e-8,
            demagnetizing_factor: 0.0, // ~0 for rods with L/D > 30
            rod_counts: [3, 3, 0],
            hysteresis: FlatleyParameters::default(),
            hysteresis_mode: HysteresisMode::default(),
            slope_tolerance: 0.0,
        }
    }
}

impl SpacecraftConfig {
    pub fn inertia_tensor(&self) -> na::Matrix3<f64> {
        na::Matrix3::from_row_slice(&self.inertia)
    }

    pub fn orientation(&self) -> Triad {
        self.orientation.map(na::Vector3::from)
    }

    pub fn angular_velocity(&self) -> na::Vector3<f64> {
        na::Vector3::from(self.angular_velocity)
    }

    pub fn angular_acceleration(&self) -> na::Vector3<f64> {
        na::Vector3::from(self.angular_acceleration)
    }

    pub fn bar_direction(&self) -> na::Vector3<f64> {
        na::Vector3::from(self.bar_direction)
    }
}
