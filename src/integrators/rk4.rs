use crate::errors::SimError;
use crate::models::SimulationContext;
use crate::physics::dynamics::{EquationsOfMotion, HasKinematics};

/// Four independent trials from the same start, blended 1:2:2:1.
///
/// Only the kinematics are averaged. Everything else, including the rods'
/// hysteresis memory, is taken from the full-step trial.
pub struct RK4<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> RK4<T>
where
    T::State: HasKinematics,
{
    pub fn new(eom: T) -> Self {
        RK4 { eom }
    }

    pub fn integrate(
        &self,
        state: &mut T::State,
        context: &mut SimulationContext,
        dt: f64,
    ) -> Result<(), SimError> {
        let trial = |dt: f64| -> Result<(T::State, SimulationContext), SimError> {
            let mut s = state.clone();
            let mut c = context.clone();
            self.eom.advance(&mut s, &mut c, dt)?;
            Ok((s, c))
        };

        let (s1, c1) = trial(dt)?;
        let (s2, _) = trial(dt / 2.0)?;
        let (s3, _) = trial(dt / 2.0)?;
        let (s4, _) = trial(dt)?;

        let k1 = s1.kinematics();
        let k2 = s2.kinematics();
        let k3 = s3.kinematics();
        let k4 = s4.kinematics();
        let blended = (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (1.0 / 6.0);

        *state = s1;
        state.set_kinematics(blended)?;

        *context = c1;
        let adopted = state.kinematics();
        context.angular_velocity = adopted.angular_velocity;
        context.orientation = adopted.orientation;
        Ok(())
    }
}
