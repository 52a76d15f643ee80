use super::attitude::magnetic_torque;
use crate::errors::SimError;
use crate::models::{SatelliteState, SimulationContext};
use crate::numerics::rotation::Triad;
use crate::numerics::time_series::TimeSeries;
use nalgebra as na;
use std::ops::{Add, Mul};

/// A single physics sub-step that mutates the state in place.
pub trait EquationsOfMotion {
    type State: Clone;

    fn advance(
        &self,
        state: &mut Self::State,
        context: &mut SimulationContext,
        dt: f64,
    ) -> Result<(), SimError>;
}

/// The part of the state an integrator blends across trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub angular_velocity: na::Vector3<f64>,
    pub orientation: Triad,
}

impl Add for Kinematics {
    type Output = Kinematics;

    fn add(self, other: Kinematics) -> Kinematics {
        Kinematics {
            angular_velocity: self.angular_velocity + other.angular_velocity,
            orientation: [
                self.orientation[0] + other.orientation[0],
                self.orientation[1] + other.orientation[1],
                self.orientation[2] + other.orientation[2],
            ],
        }
    }
}

impl Mul<f64> for Kinematics {
    type Output = Kinematics;

    fn mul(self, scalar: f64) -> Kinematics {
        Kinematics {
            angular_velocity: self.angular_velocity * scalar,
            orientation: [
                self.orientation[0] * scalar,
                self.orientation[1] * scalar,
                self.orientation[2] * scalar,
            ],
        }
    }
}

pub trait HasKinematics {
    fn kinematics(&self) -> Kinematics;

    /// Adopts blended kinematics. Axes come back renormalized.
    fn set_kinematics(&mut self, kinematics: Kinematics) -> Result<(), SimError>;
}

impl HasKinematics for SatelliteState {
    fn kinematics(&self) -> Kinematics {
        Kinematics {
            angular_velocity: self.angular_velocity(),
            orientation: self.orientation(),
        }
    }

    fn set_kinematics(&mut self, kinematics: Kinematics) -> Result<(), SimError> {
        self.set_orientation(kinematics.orientation)?;
        self.set_angular_velocity(kinematics.angular_velocity);
        Ok(())
    }
}

/// Rods magnetized by an interpolated ambient field, torquing a rigid body.
pub struct MagneticDynamics<'a> {
    field: &'a TimeSeries<na::Vector3<f64>>,
    apply_bar_magnet: bool,
}

impl<'a> MagneticDynamics<'a> {
    pub fn new(field: &'a TimeSeries<na::Vector3<f64>>, apply_bar_magnet: bool) -> Self {
        Self {
            field,
            apply_bar_magnet,
        }
    }
}

impl EquationsOfMotion for MagneticDynamics<'_> {
    type State = SatelliteState;

    fn advance(
        &self,
        state: &mut SatelliteState,
        context: &mut SimulationContext,
        dt: f64,
    ) -> Result<(), SimError> {
        let h = self.field.lagrange_interpolate(context.time)?;

        state.update_magnetization(&h);
        let mut moment = state.net_magnetic_moment();
        if self.apply_bar_magnet {
            moment += state.bar_magnet_moment();
        }

        let torque = magnetic_torque(&moment, &h);
        state.apply_torque(&torque, dt)?;

        context.moment = moment;
        context.torque = torque;
        context.angular_velocity = state.angular_velocity();
        context.angular_acceleration = state.angular_acceleration();
        context.orientation = state.orientation();
        context.hysteresis_flux = state.hysteresis_flux();
        Ok(())
    }
}
