pub mod config;
pub mod constants;
pub mod errors;
pub mod fsm;
pub mod integrators;
pub mod io;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod simulation;
pub mod telemetry;
