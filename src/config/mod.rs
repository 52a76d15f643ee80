pub mod simulation;
pub mod spacecraft;

pub use simulation::{FieldSourceConfig, RunConfig, SimulationConfig};
pub use spacecraft::SpacecraftConfig;
