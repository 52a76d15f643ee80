use crate::constants::MU_0;
use crate::errors::SimError;
use crate::numerics::rotation::{axis_angle_matrix, unit_direction, Triad};
use nalgebra as na;

/// Rotation vector swept in `dt`.
///
/// First order in `dt`; there is no `0.5 * alpha * dt^2` term.
pub fn rotation_increment(angular_velocity: &na::Vector3<f64>, dt: f64) -> na::Vector3<f64> {
    angular_velocity * dt
}

/// Rotates every axis of `triad` by the rotation vector `delta_theta` and
/// renormalizes each one. Orthogonality between axes is not corrected.
pub fn rotate_triad(triad: &Triad, delta_theta: &na::Vector3<f64>) -> Result<Triad, SimError> {
    let angle = delta_theta.magnitude();
    if angle == 0.0 {
        return Ok(*triad);
    }

    let axis = unit_direction(delta_theta, "rotation increment")?;
    let rotation = axis_angle_matrix(&axis, angle);

    Ok([
        unit_direction(&(rotation * triad[0]), "body x axis")?,
        unit_direction(&(rotation * triad[1]), "body y axis")?,
        unit_direction(&(rotation * triad[2]), "body z axis")?,
    ])
}

/// `I^-1 * torque`, with the torque taken as already aligned with the
/// inertia tensor's frame.
pub fn angular_acceleration(
    inertia_inverse: &na::Matrix3<f64>,
    torque: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    inertia_inverse * torque
}

/// Torque (N m) on moment `m` (A m^2) in auxiliary field `h` (A/m).
pub fn magnetic_torque(moment: &na::Vector3<f64>, h: &na::Vector3<f64>) -> na::Vector3<f64> {
    moment.cross(h) * MU_0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;
    use crate::numerics::rotation::identity_triad;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_increment_leaves_triad_alone() {
        let triad = identity_triad();
        let rotated = rotate_triad(&triad, &na::Vector3::zeros()).unwrap();
        assert_eq!(rotated, triad);
    }

    #[test]
    fn half_turn_about_z() {
        let rotated = rotate_triad(&identity_triad(), &na::Vector3::new(0.0, 0.0, PI)).unwrap();
        assert_abs_diff_eq!(rotated[0], -na::Vector3::x(), epsilon = 1e-12);
        assert_abs_diff_eq!(rotated[1], -na::Vector3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(rotated[2], na::Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn torque_is_perpendicular_to_moment_and_field() {
        let m = na::Vector3::new(0.0, 1.0, 0.0);
        let h = na::Vector3::new(10.0, 0.0, 0.0);
        let torque = magnetic_torque(&m, &h);
        assert_abs_diff_eq!(torque, na::Vector3::new(0.0, 0.0, -10.0 * MU_0), epsilon = 1e-18);
    }

    #[test]
    fn acceleration_scales_with_inverse_inertia() {
        let inverse = na::Matrix3::from_diagonal(&na::Vector3::new(0.5, 0.25, 1.0));
        let alpha = angular_acceleration(&inverse, &na::Vector3::new(2.0, 4.0, -1.0));
        assert_abs_diff_eq!(alpha, na::Vector3::new(1.0, 1.0, -1.0), epsilon = 1e-15);
    }
}
