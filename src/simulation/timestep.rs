use crate::errors::SimError;
use nalgebra as na;

/// How the step length is chosen each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimestepPolicy {
    Fixed(f64),
    /// Shrinks from `max` toward `min` as the spin rate grows.
    Adaptive { min: f64, max: f64 },
}

impl TimestepPolicy {
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        };

        match *self {
            TimestepPolicy::Fixed(dt) => positive("timestep", dt),
            TimestepPolicy::Adaptive { min, max } => {
                positive("minimum timestep", min)?;
                positive("maximum timestep", max)?;
                if min > max {
                    return Err(SimError::InvalidParameter(format!(
                        "minimum timestep {} exceeds maximum {}",
                        min, max
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn next(&self, angular_velocity: &na::Vector3<f64>) -> f64 {
        match *self {
            TimestepPolicy::Fixed(dt) => dt,
            TimestepPolicy::Adaptive { min, max } => {
                let omega = angular_velocity.magnitude();
                (omega * min + max) / (1.0 + omega)
            }
        }
    }
}
