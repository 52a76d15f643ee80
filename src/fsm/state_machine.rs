use super::run_states::RunPhase;
use crate::errors::SimError;
use crate::models::Timestamp;
use tracing::info;

/// Tracks a single-shot run through Idle -> Stepping -> Done.
#[derive(Debug)]
pub struct RunStateMachine {
    current_phase: RunPhase,
    last_phase_change: Option<Timestamp>,
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self {
            current_phase: RunPhase::Idle,
            last_phase_change: None,
        }
    }

    pub fn current_phase(&self) -> RunPhase {
        self.current_phase
    }

    pub fn last_phase_change(&self) -> Option<Timestamp> {
        self.last_phase_change
    }

    fn transition_to(&mut self, new_phase: RunPhase, time: Timestamp) {
        if self.current_phase != new_phase {
            info!(%time, from = %self.current_phase, to = %new_phase, "Run phase transition");
            self.current_phase = new_phase;
            self.last_phase_change = Some(time);
        }
    }

    pub fn begin(&mut self, time: Timestamp) -> Result<(), SimError> {
        match self.current_phase {
            RunPhase::Idle => {
                self.transition_to(RunPhase::Stepping, time);
                Ok(())
            }
            phase => Err(SimError::InvalidParameter(format!(
                "a simulation can only run once (currently {})",
                phase
            ))),
        }
    }

    pub fn finish(&mut self, time: Timestamp) {
        self.transition_to(RunPhase::Done, time);
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.current_phase, RunPhase::Stepping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_once() {
        let t = Timestamp::from_gregorian_utc(2025, 10, 1, 7, 0, 0, 0);
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.current_phase(), RunPhase::Idle);

        machine.begin(t).unwrap();
        assert!(machine.is_stepping());
        machine.finish(t + 900.0);
        assert_eq!(machine.current_phase(), RunPhase::Done);
        assert_eq!(machine.last_phase_change(), Some(t + 900.0));

        assert!(matches!(machine.begin(t), Err(SimError::InvalidParameter(_))));
    }
}
