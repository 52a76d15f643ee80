use crate::models::timestamp::Timestamp;
use crate::numerics::rotation::{identity_triad, Triad};
use nalgebra as na;

/// Values produced by the most recent step, in the inertial frame unless
/// the name says otherwise.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub time: Timestamp,
    pub moment: na::Vector3<f64>,
    pub torque: na::Vector3<f64>,
    pub angular_velocity: na::Vector3<f64>,
    pub angular_acceleration: na::Vector3<f64>,
    pub hysteresis_flux: na::Vector3<f64>,
    // Body axes at the end of the step
    pub orientation: Triad,
}

impl SimulationContext {
    pub fn new(time: Timestamp) -> Self {
        SimulationContext {
            time,
            moment: na::Vector3::zeros(),
            torque: na::Vector3::zeros(),
            angular_velocity: na::Vector3::zeros(),
            angular_acceleration: na::Vector3::zeros(),
            hysteresis_flux: na::Vector3::zeros(),
            orientation: identity_triad(),
        }
    }
}
