use crate::errors::SimError;
use nalgebra as na;

/// Body axes `[x, y, z]` expressed in the inertial frame.
pub type Triad = [na::Vector3<f64>; 3];

pub fn identity_triad() -> Triad {
    [
        na::Vector3::x(),
        na::Vector3::y(),
        na::Vector3::z(),
    ]
}

/// Unit vector along `v`; fails only when `v` has exactly zero length.
pub fn unit_direction(
    v: &na::Vector3<f64>,
    what: &'static str,
) -> Result<na::Vector3<f64>, SimError> {
    let magnitude = v.magnitude();
    if magnitude == 0.0 {
        return Err(SimError::DegenerateVector(what));
    }
    Ok(v / magnitude)
}

pub fn invert(m: &na::Matrix3<f64>) -> Result<na::Matrix3<f64>, SimError> {
    if m.determinant() == 0.0 {
        return Err(SimError::SingularMatrix);
    }
    m.try_inverse().ok_or(SimError::SingularMatrix)
}

/// Rodrigues rotation by `angle` radians about the unit vector `u`.
#[rustfmt::skip]
pub fn axis_angle_matrix(u: &na::Vector3<f64>, angle: f64) -> na::Matrix3<f64> {
    let (ux, uy, uz) = (u[0], u[1], u[2]);
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    na::Matrix3::new(
        ux*ux*t + c,    ux*uy*t - uz*s, ux*uz*t + uy*s,
        ux*uy*t + uz*s, uy*uy*t + c,    uy*uz*t - ux*s,
        ux*uz*t - uy*s, uy*uz*t + ux*s, uz*uz*t + c
    )
}

/// Components of `v` along each axis of `triad`.
pub fn project_onto(triad: &Triad, v: &na::Vector3<f64>) -> na::Vector3<f64> {
    na::Vector3::new(triad[0].dot(v), triad[1].dot(v), triad[2].dot(v))
}

/// Classical Gram-Schmidt, keeping `x` fixed in direction.
pub fn gram_schmidt(triad: &Triad) -> Result<Triad, SimError> {
    let x = unit_direction(&triad[0], "x axis")?;
    let y = unit_direction(&(triad[1] - x * x.dot(&triad[1])), "y axis")?;
    let z = unit_direction(
        &(triad[2] - x * x.dot(&triad[2]) - y * y.dot(&triad[2])),
        "z axis",
    )?;
    Ok([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quarter_turn_about_z() {
        let r = axis_angle_matrix(&na::Vector3::z(), PI / 2.0);
        assert_abs_diff_eq!(r * na::Vector3::x(), na::Vector3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn matches_nalgebra_rotation() {
        let axis = na::Vector3::new(1.0, -2.0, 0.5).normalize();
        let ours = axis_angle_matrix(&axis, 0.7);
        let reference = na::Rotation3::from_axis_angle(&na::Unit::new_normalize(axis), 0.7);
        assert_abs_diff_eq!(ours, *reference.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(matches!(
            unit_direction(&na::Vector3::zeros(), "test"),
            Err(SimError::DegenerateVector("test"))
        ));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let m = na::Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0);
        assert!(matches!(invert(&m), Err(SimError::SingularMatrix)));
        assert!(invert(&na::Matrix3::identity()).is_ok());
    }

    #[test]
    fn gram_schmidt_restores_orthogonality() {
        let skewed = [
            na::Vector3::new(1.0, 0.0, 0.0),
            na::Vector3::new(0.1, 1.0, 0.0),
            na::Vector3::new(0.05, -0.02, 0.9),
        ];
        let fixed = gram_schmidt(&skewed).unwrap();
        assert_abs_diff_eq!(fixed[0].dot(&fixed[1]), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fixed[1].dot(&fixed[2]), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fixed[2].magnitude(), 1.0, epsilon = 1e-12);
    }
}
