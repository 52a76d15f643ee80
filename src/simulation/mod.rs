pub mod runner;
pub mod timestep;

pub use runner::{RunSummary, Simulation};
pub use timestep::TimestepPolicy;
