pub mod run_states;
pub mod state_machine;

pub use run_states::RunPhase;
pub use state_machine::RunStateMachine;
