use crate::config::spacecraft::SpacecraftConfig;
use crate::constants::MU_0;
use crate::errors::SimError;
use crate::numerics::rotation::{gram_schmidt, invert, unit_direction, Triad};
use crate::physics::attitude::{angular_acceleration, rotate_triad, rotation_increment};
use crate::physics::hysteresis::FlatleyRod;
use nalgebra as na;

/// Rigid body carrying three banks of hysteresis rods.
///
/// Cloning gives a fully independent copy, rods included.
#[derive(Debug, Clone)]
pub struct SatelliteState {
    inertia_tensor: na::Matrix3<f64>,
    inertia_inverse: na::Matrix3<f64>,

    // Attitude state (inertial frame)
    orientation: Triad,
    angular_velocity: na::Vector3<f64>,
    angular_acceleration: na::Vector3<f64>,

    // Magnetic properties
    bar_moment: f64,
    bar_direction: na::Vector3<f64>,
    rod_volume: f64,
    demagnetizing_factor: f64,
    rod_counts: [u32; 3],
    rods: [FlatleyRod; 3],
    axis_moments: [f64; 3],
}

impl SatelliteState {
    pub fn new(config: &SpacecraftConfig) -> Result<Self, SimError> {
        if config.demagnetizing_factor == 1.0 {
            return Err(SimError::InvalidParameter(
                "demagnetizing factor of 1 gives an infinite rod moment".to_string(),
            ));
        }
        if !(config.rod_volume >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "rod volume must be non-negative, got {}",
                config.rod_volume
            )));
        }

        let inertia_tensor = config.inertia_tensor();
        let inertia_inverse = invert(&inertia_tensor)?;

        let initial = config.orientation();
        let orientation = [
            unit_direction(&initial[0], "body x axis")?,
            unit_direction(&initial[1], "body y axis")?,
            unit_direction(&initial[2], "body z axis")?,
        ];

        let make_rod = |axis: na::Vector3<f64>| -> Result<FlatleyRod, SimError> {
            Ok(FlatleyRod::new(config.hysteresis, axis)?
                .with_mode(config.hysteresis_mode)
                .with_tolerance(config.slope_tolerance))
        };
        let rods = [
            make_rod(orientation[0])?,
            make_rod(orientation[1])?,
            make_rod(orientation[2])?,
        ];

        let bar_direction = if config.bar_moment == 0.0 {
            config.bar_direction()
        } else {
            unit_direction(&config.bar_direction(), "bar magnet direction")?
        };

        Ok(SatelliteState {
            inertia_tensor,
            inertia_inverse,
            orientation,
            angular_velocity: config.angular_velocity(),
            angular_acceleration: config.angular_acceleration(),
            bar_moment: config.bar_moment,
            bar_direction,
            rod_volume: config.rod_volume,
            demagnetizing_factor: config.demagnetizing_factor,
            rod_counts: config.rod_counts,
            rods,
            axis_moments: [0.0; 3],
        })
    }

    pub fn inertia_tensor(&self) -> na::Matrix3<f64> {
        self.inertia_tensor
    }

    pub fn set_inertia_tensor(&mut self, inertia: na::Matrix3<f64>) -> Result<(), SimError> {
        self.inertia_inverse = invert(&inertia)?;
        self.inertia_tensor = inertia;
        Ok(())
    }

    pub fn orientation(&self) -> Triad {
        self.orientation
    }

    /// Replaces the body axes, normalizing each to unit length.
    pub fn set_orientation(&mut self, triad: Triad) -> Result<(), SimError> {
        self.orientation = [
            unit_direction(&triad[0], "body x axis")?,
            unit_direction(&triad[1], "body y axis")?,
            unit_direction(&triad[2], "body z axis")?,
        ];
        Ok(())
    }

    pub fn reorthonormalize(&mut self) -> Result<(), SimError> {
        self.orientation = gram_schmidt(&self.orientation)?;
        Ok(())
    }

    pub fn angular_velocity(&self) -> na::Vector3<f64> {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, omega: na::Vector3<f64>) {
        self.angular_velocity = omega;
    }

    pub fn angular_acceleration(&self) -> na::Vector3<f64> {
        self.angular_acceleration
    }

    pub fn set_angular_acceleration(&mut self, alpha: na::Vector3<f64>) {
        self.angular_acceleration = alpha;
    }

    pub fn bar_moment(&self) -> f64 {
        self.bar_moment
    }

    /// Permanent magnet moment in the inertial frame.
    pub fn bar_magnet_moment(&self) -> na::Vector3<f64> {
        let d = self.bar_direction;
        (self.orientation[0] * d[0] + self.orientation[1] * d[1] + self.orientation[2] * d[2])
            * self.bar_moment
    }

    pub fn rod_volume(&self) -> f64 {
        self.rod_volume
    }

    pub fn demagnetizing_factor(&self) -> f64 {
        self.demagnetizing_factor
    }

    pub fn rod_counts(&self) -> [u32; 3] {
        self.rod_counts
    }

    pub fn rods(&self) -> &[FlatleyRod; 3] {
        &self.rods
    }

    /// Moment (A m^2) of each rod bank along its own body axis.
    pub fn axis_moments(&self) -> na::Vector3<f64> {
        na::Vector3::from(self.axis_moments)
    }

    /// Drives every rod bank with the auxiliary field `h` (A/m).
    pub fn update_magnetization(&mut self, h: &na::Vector3<f64>) {
        for i in 0..3 {
            let axis = self.orientation[i];
            let b = self.rods[i].update_field(h, &axis);

            // Magnetization inside a finite rod, corrected for demagnetization
            self.axis_moments[i] = f64::from(self.rod_counts[i]) * self.rod_volume
                * (b / MU_0 - h.dot(&axis))
                / (1.0 - self.demagnetizing_factor);
        }
    }

    pub fn net_magnetic_moment(&self) -> na::Vector3<f64> {
        self.orientation
            .iter()
            .zip(self.axis_moments.iter())
            .fold(na::Vector3::zeros(), |acc, (axis, m)| acc + axis * *m)
    }

    /// Sum of the rods' flux density vectors (T).
    pub fn hysteresis_flux(&self) -> na::Vector3<f64> {
        self.rods
            .iter()
            .fold(na::Vector3::zeros(), |acc, rod| acc + rod.field())
    }

    /// Rotates the body by its current angular velocity over `dt`, then
    /// advances the angular velocity and takes a new acceleration from `torque`.
    pub fn apply_torque(&mut self, torque: &na::Vector3<f64>, dt: f64) -> Result<(), SimError> {
        let delta_theta = rotation_increment(&self.angular_velocity, dt);
        self.orientation = rotate_triad(&self.orientation, &delta_theta)?;

        self.angular_velocity += self.angular_acceleration * dt;
        self.angular_acceleration = angular_acceleration(&self.inertia_inverse, torque);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::hysteresis::HysteresisMode;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_sat() -> SpacecraftConfig {
        SpacecraftConfig {
            inertia: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            angular_velocity: [0.0, 0.0, 0.6],
            angular_acceleration: [0.0; 3],
            bar_moment: 0.0,
            ..SpacecraftConfig::default()
        }
    }

    #[test]
    fn singular_inertia_is_rejected() {
        let config = SpacecraftConfig {
            inertia: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            ..unit_sat()
        };
        assert!(matches!(SatelliteState::new(&config), Err(SimError::SingularMatrix)));
    }

    #[test]
    fn zero_axis_is_rejected() {
        let config = SpacecraftConfig {
            orientation: [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            ..unit_sat()
        };
        assert!(matches!(
            SatelliteState::new(&config),
            Err(SimError::DegenerateVector(_))
        ));
    }

    #[test]
    fn spin_about_z_rotates_x_toward_y() {
        let mut sat = SatelliteState::new(&unit_sat()).unwrap();
        sat.apply_torque(&na::Vector3::zeros(), 1.0).unwrap();

        let [x, y, z] = sat.orientation();
        assert_abs_diff_eq!(
            x,
            na::Vector3::new(0.6_f64.cos(), 0.6_f64.sin(), 0.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            y,
            na::Vector3::new(-0.6_f64.sin(), 0.6_f64.cos(), 0.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(z, na::Vector3::z(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            sat.angular_velocity(),
            na::Vector3::new(0.0, 0.0, 0.6),
            epsilon = 1e-15
        );
    }

    #[test]
    fn acceleration_lags_torque_by_one_call() {
        let mut sat = SatelliteState::new(&unit_sat()).unwrap();
        let torque = na::Vector3::new(0.0, 0.0, 0.1);

        sat.apply_torque(&torque, 2.0).unwrap();
        assert_abs_diff_eq!(sat.angular_acceleration(), torque, epsilon = 1e-15);
        assert_abs_diff_eq!(
            sat.angular_velocity(),
            na::Vector3::new(0.0, 0.0, 0.6),
            epsilon = 1e-15
        );

        sat.apply_torque(&torque, 2.0).unwrap();
        assert_abs_diff_eq!(
            sat.angular_velocity(),
            na::Vector3::new(0.0, 0.0, 0.8),
            epsilon = 1e-15
        );
    }

    #[test]
    fn axes_stay_unit_length_under_random_torques() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sat = SatelliteState::new(&SpacecraftConfig::default()).unwrap();

        for _ in 0..500 {
            let torque = na::Vector3::new(
                rng.gen_range(-1e3..1e3),
                rng.gen_range(-1e3..1e3),
                rng.gen_range(-1e3..1e3),
            );
            let dt = rng.gen_range(1e-3..5.0);
            sat.apply_torque(&torque, dt).unwrap();
            for axis in sat.orientation() {
                assert_abs_diff_eq!(axis.magnitude(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn rod_moment_matches_closed_form() {
        let config = SpacecraftConfig {
            rod_counts: [3, 0, 0],
            rod_volume: 1e-6,
            demagnetizing_factor: 0.5,
            hysteresis_mode: HysteresisMode::Asymptote,
            ..unit_sat()
        };
        let mut sat = SatelliteState::new(&config).unwrap();
        let h = na::Vector3::new(20.0, 7.0, 0.0);
        sat.update_magnetization(&h);

        let b = sat.rods()[0].magnetization();
        let expected = 3.0 * 1e-6 * (b / MU_0 - 20.0) / 0.5;
        assert_abs_diff_eq!(sat.axis_moments()[0], expected, epsilon = 1e-12);
        assert_eq!(sat.axis_moments()[1], 0.0);
        assert_abs_diff_eq!(
            sat.net_magnetic_moment(),
            na::Vector3::new(expected, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn no_rods_means_no_moment() {
        let config = SpacecraftConfig {
            rod_counts: [0, 0, 0],
            ..unit_sat()
        };
        let mut sat = SatelliteState::new(&config).unwrap();
        sat.update_magnetization(&na::Vector3::new(30.0, -12.0, 4.0));
        assert_eq!(sat.net_magnetic_moment(), na::Vector3::zeros());
        // The rods still respond even when none are fitted
        assert!(sat.hysteresis_flux().magnitude() > 0.0);
    }

    #[test]
    fn bar_magnet_follows_body() {
        let config = SpacecraftConfig {
            bar_moment: 2.0,
            bar_direction: [0.0, 0.0, 1.0],
            orientation: [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            ..unit_sat()
        };
        let sat = SatelliteState::new(&config).unwrap();
        assert_abs_diff_eq!(
            sat.bar_magnet_moment(),
            na::Vector3::new(2.0, 0.0, 0.0),
            epsilon = 1e-15
        );
    }
}
