pub mod context;
pub mod state;
pub mod timestamp;

pub use context::SimulationContext;
pub use state::SatelliteState;
pub use timestamp::Timestamp;
