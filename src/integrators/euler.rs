use crate::errors::SimError;
use crate::models::SimulationContext;
use crate::physics::dynamics::EquationsOfMotion;

/// One physics sub-step per step.
pub struct Euler<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> Euler<T> {
    pub fn new(eom: T) -> Self {
        Euler { eom }
    }

    pub fn integrate(
        &self,
        state: &mut T::State,
        context: &mut SimulationContext,
        dt: f64,
    ) -> Result<(), SimError> {
        self.eom.advance(state, context, dt)
    }
}
